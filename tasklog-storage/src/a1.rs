//! A1-notation addressing.
//!
//! Columns are labelled in bijective base 26: `A..Z`, then `AA..ZZ`, then
//! `AAA..`. There is no zero digit, so each step subtracts one before
//! taking the remainder.

use tasklog_core::{ColumnIndex, RowPosition};

use crate::error::{StoreError, StoreResult};

/// Letter label of a 1-based column number. `0` has no label.
pub fn column_label(column: u32) -> Option<String> {
    if column == 0 {
        return None;
    }
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

/// Quote a worksheet title for use in a range, doubling embedded quotes.
pub fn quote_table(table: &str) -> String {
    format!("'{}'", table.replace('\'', "''"))
}

/// Full-width range of one row: `'Table'!A{row}:{last}{row}`.
pub fn row_range(table: &str, position: RowPosition, width: usize) -> StoreResult<String> {
    let last = u32::try_from(width)
        .ok()
        .and_then(column_label)
        .ok_or_else(|| StoreError::InvalidRange {
            reason: format!("row width {} has no column label", width),
        })?;
    let row = position.get();
    Ok(format!("{}!A{}:{}{}", quote_table(table), row, last, row))
}

/// Whole-column range: `'Table'!C:C`.
pub fn column_range(table: &str, column: ColumnIndex) -> StoreResult<String> {
    let label = column_label(column.get()).ok_or_else(|| StoreError::InvalidRange {
        reason: format!("column {} has no label", column.get()),
    })?;
    Ok(format!("{}!{}:{}", quote_table(table), label, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn label(n: u32) -> String {
        column_label(n).unwrap_or_default()
    }

    #[test]
    fn test_single_letters() {
        assert_eq!(label(1), "A");
        assert_eq!(label(17), "Q");
        assert_eq!(label(26), "Z");
    }

    #[test]
    fn test_two_and_three_letters() {
        assert_eq!(label(27), "AA");
        assert_eq!(label(28), "AB");
        assert_eq!(label(52), "AZ");
        assert_eq!(label(53), "BA");
        assert_eq!(label(702), "ZZ");
        assert_eq!(label(703), "AAA");
    }

    #[test]
    fn test_zero_has_no_label() {
        assert_eq!(column_label(0), None);
    }

    #[test]
    fn test_row_range() -> StoreResult<()> {
        let Some(row) = RowPosition::new(5) else {
            panic!("non-zero position");
        };
        assert_eq!(row_range("TaskData", row, 17)?, "'TaskData'!A5:Q5");
        assert_eq!(row_range("TaskData", row, 27)?, "'TaskData'!A5:AA5");
        assert!(row_range("TaskData", row, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_column_range_and_quoting() -> StoreResult<()> {
        assert_eq!(column_range("TaskData", ColumnIndex::FIRST)?, "'TaskData'!A:A");
        assert_eq!(quote_table("Bob's Data"), "'Bob''s Data'");
        Ok(())
    }

    fn decode(label: &str) -> u32 {
        label
            .bytes()
            .fold(0, |acc, b| acc * 26 + u32::from(b - b'A' + 1))
    }

    proptest! {
        #[test]
        fn prop_label_round_trips(n in 1u32..100_000) {
            let l = label(n);
            prop_assert!(l.bytes().all(|b| b.is_ascii_uppercase()));
            prop_assert_eq!(decode(&l), n);
        }
    }
}
