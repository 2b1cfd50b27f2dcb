//! 1-based row and column coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based column number within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnIndex(u32);

impl ColumnIndex {
    /// The first column. Natural keys live here.
    pub const FIRST: ColumnIndex = ColumnIndex(1);

    /// Returns `None` for `0`.
    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(ColumnIndex(index))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based offset into a row vector.
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

/// 1-based row number within a table, header row included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowPosition(u32);

impl RowPosition {
    /// Returns `None` for `0`.
    pub fn new(position: u32) -> Option<Self> {
        (position > 0).then_some(RowPosition(position))
    }

    /// Position of the row at zero-based `offset`.
    pub fn from_offset(offset: usize) -> Option<Self> {
        u32::try_from(offset)
            .ok()
            .and_then(|o| o.checked_add(1))
            .map(RowPosition)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_rejected() {
        assert!(ColumnIndex::new(0).is_none());
        assert!(RowPosition::new(0).is_none());
    }

    #[test]
    fn test_offsets_are_zero_based() {
        assert_eq!(ColumnIndex::FIRST.offset(), 0);
        assert_eq!(RowPosition::from_offset(0).map(RowPosition::get), Some(1));
        assert_eq!(RowPosition::new(7).map(RowPosition::offset), Some(6));
    }
}
