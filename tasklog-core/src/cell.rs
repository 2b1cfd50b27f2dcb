//! Cell values as they travel to the tabular store.
//!
//! A cell keeps the JSON type the client sent for numbers and booleans so
//! the store can parse them as numbers (USER_ENTERED input). Nested JSON is
//! flattened to its compact text form because a cell cannot hold structure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// A single cell in a projected row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Absent field. Written as an empty string.
    #[default]
    Empty,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl CellValue {
    /// Convert an arbitrary JSON value into a cell.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => CellValue::Number(n.clone()),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// Wire representation of this cell.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Number(n) => Value::Number(n.clone()),
            CellValue::Text(s) => Value::String(s.clone()),
        }
    }

    /// True for an empty cell or the empty string.
    ///
    /// Only text can be blank; `0`, `false` and whitespace are real values.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Bool(_) | CellValue::Number(_) => false,
        }
    }

    /// Textual rendering used for natural-key comparison.
    ///
    /// Integral floats render without a fractional part so that `101.0`
    /// sent by a client matches `101` read back from the store.
    pub fn key_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => i.to_string(),
                (_, Some(u), _) => u.to_string(),
                (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
                    format!("{}", f as i64)
                }
                _ => n.to_string(),
            },
        }
    }

    /// Key text as the store holds it once user input has been parsed.
    ///
    /// Rows are written as user-entered input, so text such as `"007"` lands
    /// as the number 7 and `"true"` as a boolean. Keys are compared in that
    /// parsed form on both sides.
    pub fn stored_key_text(&self) -> String {
        match self {
            CellValue::Text(s) => parse_entered(s).map_or_else(|| s.clone(), |c| c.key_text()),
            other => other.key_text(),
        }
    }
}

/// The typed value a spreadsheet infers from entered text, if any.
fn parse_entered(text: &str) -> Option<CellValue> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(CellValue::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(CellValue::Bool(false));
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(CellValue::from(int));
    }
    // `f64::from_str` also accepts "inf" and "NaN"; require a digit.
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() => Some(CellValue::from(float)),
        _ => None,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_text())
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Number(n) => n.serialize(serializer),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(CellValue::from_json(&value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(Number::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON form and become empty cells.
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty)
    }
}
