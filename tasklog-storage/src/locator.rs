//! Upsert Locator
//!
//! Finds the row that already represents a natural key. The scan reads the
//! whole key column, so each lookup costs one round-trip and O(rows) work;
//! task tables hold one row per subject, which keeps this small.

use std::sync::Arc;

use tasklog_core::{CellValue, ColumnIndex, RowPosition};

use crate::error::{StoreError, StoreResult};
use crate::store::TabularStore;

/// Outcome of a key lookup. `NotFound` is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    Found(RowPosition),
    NotFound,
}

/// Rows above the data: the column-name header.
const HEADER_ROWS: usize = 1;

#[derive(Clone)]
pub struct UpsertLocator {
    store: Arc<dyn TabularStore>,
}

impl UpsertLocator {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// First data row whose `key_column` cell equals `key`.
    ///
    /// The header row is never a match. Both sides are compared as the store
    /// parses entered text, so `"007"` finds a cell holding the number 7.
    /// Store faults propagate; they never turn into `NotFound`.
    pub async fn locate(
        &self,
        table: &str,
        key_column: ColumnIndex,
        key: &str,
    ) -> StoreResult<Located> {
        let cells = self.store.read_column(table, key_column).await?;
        let target = CellValue::from(key).stored_key_text();
        let found = cells
            .iter()
            .enumerate()
            .skip(HEADER_ROWS)
            .find(|(_, cell)| cell.stored_key_text() == target);
        let Some((offset, _)) = found else {
            return Ok(Located::NotFound);
        };
        let position = RowPosition::from_offset(offset)
            .ok_or_else(|| StoreError::malformed(format!("row offset {} out of range", offset)))?;
        Ok(Located::Found(position))
    }
}
