//! Tabular store trait.

use async_trait::async_trait;
use tasklog_core::{CellValue, ColumnIndex, Row, RowPosition};

use crate::error::StoreResult;

/// A remote store of named tables addressed by 1-based row and column.
///
/// Implementations hold one process-wide session and are shared by every
/// request. They must submit values in a mode that keeps numbers numeric.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Append `rows` after the last row of `table` in one call.
    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()>;

    /// Replace columns `1..=row.len()` of the row at `position`.
    async fn write_row(&self, table: &str, position: RowPosition, row: &Row) -> StoreResult<()>;

    /// Every cell of `column`, top to bottom, header included.
    ///
    /// Trailing empty cells may be omitted; an empty table yields an empty
    /// vector rather than an error.
    async fn read_column(&self, table: &str, column: ColumnIndex) -> StoreResult<Vec<CellValue>>;

    /// Short backend name for logs and metrics.
    fn backend_name(&self) -> &'static str;
}
