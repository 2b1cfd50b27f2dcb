//! Row Projector
//!
//! Maps a field source onto a column schema. The output always has exactly
//! one cell per column, in schema order; absent fields become
//! [`CellValue::Empty`]. Fields that are not in the schema are ignored.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::cell::CellValue;
use crate::clock::Clock;
use crate::record::Record;
use crate::schema::{ColumnSchema, TIMESTAMP_COLUMN};
use crate::Row;

/// Anything that can be read field-by-field by column name.
pub trait FieldSource {
    /// Cell for `column`, or `None` when the source has no such field.
    fn field(&self, column: &str) -> Option<CellValue>;
}

/// A field source that carries a `timestamp` field.
pub trait TimestampSlot {
    fn timestamp(&self) -> Option<CellValue>;
    fn set_timestamp(&mut self, value: CellValue);
}

impl FieldSource for Map<String, Value> {
    fn field(&self, column: &str) -> Option<CellValue> {
        self.get(column).map(CellValue::from_json)
    }
}

impl TimestampSlot for Map<String, Value> {
    fn timestamp(&self) -> Option<CellValue> {
        self.field(TIMESTAMP_COLUMN)
    }

    fn set_timestamp(&mut self, value: CellValue) {
        self.insert(TIMESTAMP_COLUMN.to_string(), value.to_json());
    }
}

impl FieldSource for HashMap<String, CellValue> {
    fn field(&self, column: &str) -> Option<CellValue> {
        self.get(column).cloned()
    }
}

impl TimestampSlot for HashMap<String, CellValue> {
    fn timestamp(&self) -> Option<CellValue> {
        self.get(TIMESTAMP_COLUMN).cloned()
    }

    fn set_timestamp(&mut self, value: CellValue) {
        self.insert(TIMESTAMP_COLUMN.to_string(), value);
    }
}

/// Project `fields` onto `schema`.
pub fn project<F: FieldSource + ?Sized>(fields: &F, schema: &ColumnSchema) -> Row {
    schema
        .columns()
        .iter()
        .map(|column| fields.field(column).unwrap_or_default())
        .collect()
}

/// Project a typed record onto its own kind's schema.
pub fn project_record<R: Record>(record: &R) -> Row {
    project(record, R::KIND.schema())
}

/// Fill in a server timestamp when the source's timestamp is blank.
///
/// Returns `true` when a timestamp was injected. A non-blank client value
/// is never replaced.
pub fn ensure_timestamp<T: TimestampSlot + ?Sized>(fields: &mut T, clock: &dyn Clock) -> bool {
    let blank = fields.timestamp().map_or(true, |ts| ts.is_blank());
    if blank {
        fields.set_timestamp(CellValue::Text(clock.timestamp()));
    }
    blank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SystemClock};
    use crate::record::TrialRecord;
    use crate::schema::{BLOCK_SCHEMA, TASK_SCHEMA, TRIAL_SCHEMA};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_absent_fields_become_empty() {
        let fields = object(json!({"sub_id": "S1", "block_number": 2}));
        let row = project(&fields, &BLOCK_SCHEMA);

        assert_eq!(row.len(), BLOCK_SCHEMA.len());
        assert_eq!(row[0], CellValue::from("S1"));
        assert_eq!(row[1], CellValue::from(2i64));
        assert!(row[2..].iter().all(|c| *c == CellValue::Empty));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let fields = object(json!({"sub_id": "S1", "not_a_column": "zzz"}));
        let row = project(&fields, &TASK_SCHEMA);
        assert_eq!(row.len(), TASK_SCHEMA.len());
        assert!(!row.contains(&CellValue::from("zzz")));
    }

    #[test]
    fn test_null_projects_as_empty() {
        let fields = object(json!({"sub_id": null}));
        assert_eq!(project(&fields, &TRIAL_SCHEMA)[0], CellValue::Empty);
    }

    #[test]
    fn test_injects_when_absent() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).single();
        let Some(at) = at else {
            panic!("valid date");
        };
        let mut fields = object(json!({"sub_id": "S1"}));

        assert!(ensure_timestamp(&mut fields, &FixedClock(at)));
        let row = project(&fields, &TRIAL_SCHEMA);
        assert_eq!(row[1], CellValue::from("2025-01-02T03:04:05Z"));
    }

    #[test]
    fn test_injects_when_empty_string() {
        let mut fields = object(json!({"sub_id": "S1", "timestamp": ""}));
        assert!(ensure_timestamp(&mut fields, &SystemClock));
        assert!(!project(&fields, &TRIAL_SCHEMA)[1].is_blank());
    }

    #[test]
    fn test_client_timestamp_is_kept() {
        let mut fields = object(json!({"timestamp": "1999-12-31T23:59:59Z"}));
        assert!(!ensure_timestamp(&mut fields, &SystemClock));
        assert_eq!(
            project(&fields, &TASK_SCHEMA)[1],
            CellValue::from("1999-12-31T23:59:59Z")
        );
    }

    #[test]
    fn test_record_and_map_project_identically() -> Result<(), serde_json::Error> {
        let payload = json!({"sub_id": "S9", "trial_number": 4, "reward_received": true});
        let record: TrialRecord = serde_json::from_value(payload.clone())?;
        let map = object(payload);

        assert_eq!(project_record(&record), project(&map, &TRIAL_SCHEMA));
        Ok(())
    }

    fn field_map_strategy() -> impl Strategy<Value = HashMap<String, CellValue>> {
        let names: Vec<String> = TRIAL_SCHEMA
            .columns()
            .iter()
            .map(|c| c.to_string())
            .chain(["extra_a".to_string(), "extra_b".to_string()])
            .collect();
        let cell = prop_oneof![
            Just(CellValue::Empty),
            any::<i64>().prop_map(CellValue::from),
            any::<bool>().prop_map(CellValue::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(CellValue::Text),
        ];
        prop::collection::hash_map(prop::sample::select(names), cell, 0..12)
    }

    proptest! {
        #[test]
        fn prop_projection_matches_schema(fields in field_map_strategy()) {
            let row = project(&fields, &TRIAL_SCHEMA);
            prop_assert_eq!(row.len(), TRIAL_SCHEMA.len());
            for (i, column) in TRIAL_SCHEMA.columns().iter().enumerate() {
                let expected = fields.get(*column).cloned().unwrap_or_default();
                prop_assert_eq!(&row[i], &expected);
            }
        }

        #[test]
        fn prop_projection_is_deterministic(fields in field_map_strategy()) {
            prop_assert_eq!(project(&fields, &TRIAL_SCHEMA), project(&fields, &TRIAL_SCHEMA));
        }

        #[test]
        fn prop_timestamp_never_blank_after_injection(fields in field_map_strategy()) {
            let mut fields = fields;
            let before = fields.get("timestamp").cloned();
            let injected = ensure_timestamp(&mut fields, &SystemClock);
            let after = project(&fields, &TRIAL_SCHEMA)[1].clone();

            prop_assert!(!after.is_blank());
            if !injected {
                prop_assert_eq!(Some(after), before);
            }
        }
    }
}
