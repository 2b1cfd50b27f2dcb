//! Batch Writer
//!
//! The only component that mutates the store. Rows are checked against the
//! target schema's width before anything goes over the wire.

use std::sync::Arc;

use tasklog_core::{ColumnSchema, Row, RowPosition};

use crate::error::{StoreError, StoreResult};
use crate::store::TabularStore;

#[derive(Clone)]
pub struct BatchWriter {
    store: Arc<dyn TabularStore>,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }

    /// Append a single row at the end of the schema's table.
    pub async fn append_one(&self, schema: &ColumnSchema, row: Row) -> StoreResult<()> {
        check_width(schema, &row)?;
        self.store
            .append_rows(schema.table(), std::slice::from_ref(&row))
            .await?;
        tracing::debug!(table = schema.table(), rows = 1, "Appended row");
        Ok(())
    }

    /// Append all rows in one store call. Empty input makes no call.
    ///
    /// Returns the number of rows written.
    pub async fn append_many(&self, schema: &ColumnSchema, rows: Vec<Row>) -> StoreResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        for row in &rows {
            check_width(schema, row)?;
        }
        self.store.append_rows(schema.table(), &rows).await?;
        tracing::debug!(table = schema.table(), rows = rows.len(), "Appended batch");
        Ok(rows.len())
    }

    /// Replace the full width of the row at `position`.
    pub async fn overwrite_row(
        &self,
        schema: &ColumnSchema,
        position: RowPosition,
        row: Row,
    ) -> StoreResult<()> {
        check_width(schema, &row)?;
        self.store.write_row(schema.table(), position, &row).await?;
        tracing::debug!(table = schema.table(), %position, "Overwrote row");
        Ok(())
    }
}

fn check_width(schema: &ColumnSchema, row: &Row) -> StoreResult<()> {
    if row.len() == schema.len() {
        Ok(())
    } else {
        Err(StoreError::RowWidth {
            table: schema.table().to_string(),
            expected: schema.len(),
            actual: row.len(),
        })
    }
}
