//! Metrics decorator for any [`TabularStore`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tasklog_core::{CellValue, ColumnIndex, Row, RowPosition};
use tasklog_storage::{StoreResult, TabularStore};

use super::metrics::METRICS;

/// Wraps a store and records every call's outcome and latency.
pub struct InstrumentedStore {
    inner: Arc<dyn TabularStore>,
}

impl InstrumentedStore {
    pub fn new(inner: Arc<dyn TabularStore>) -> Self {
        Self { inner }
    }
}

fn observe<T>(operation: &str, table: &str, started: Instant, result: &StoreResult<T>) {
    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_store_operation(
            operation,
            table,
            result.is_ok(),
            started.elapsed().as_secs_f64(),
        );
    }
}

#[async_trait]
impl TabularStore for InstrumentedStore {
    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        let started = Instant::now();
        let result = self.inner.append_rows(table, rows).await;
        observe("append", table, started, &result);
        if let (Ok(()), Ok(metrics)) = (&result, METRICS.as_ref()) {
            metrics.record_rows_written(table, rows.len());
        }
        result
    }

    async fn write_row(&self, table: &str, position: RowPosition, row: &Row) -> StoreResult<()> {
        let started = Instant::now();
        let result = self.inner.write_row(table, position, row).await;
        observe("overwrite", table, started, &result);
        if let (Ok(()), Ok(metrics)) = (&result, METRICS.as_ref()) {
            metrics.record_rows_written(table, 1);
        }
        result
    }

    async fn read_column(&self, table: &str, column: ColumnIndex) -> StoreResult<Vec<CellValue>> {
        let started = Instant::now();
        let result = self.inner.read_column(table, column).await;
        observe("read_column", table, started, &result);
        result
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklog_storage::InMemoryTabularStore;

    #[tokio::test]
    async fn test_passes_results_through() -> StoreResult<()> {
        let memory = Arc::new(InMemoryTabularStore::new());
        memory.insert_table("Instrumented", Vec::new());
        let store = InstrumentedStore::new(memory.clone());

        store
            .append_rows("Instrumented", &[vec![CellValue::from("S1")]])
            .await?;
        assert_eq!(memory.row_count("Instrumented"), 1);
        assert_eq!(store.backend_name(), "memory");

        memory.fail_table("Instrumented", "down");
        assert!(store
            .read_column("Instrumented", ColumnIndex::FIRST)
            .await
            .is_err());

        let metrics = METRICS
            .as_ref()
            .map_err(|e| tasklog_storage::StoreError::transport(e.message.clone()))?;
        let failures = metrics
            .store_operations_total
            .with_label_values(&["read_column", "Instrumented", "error"])
            .get();
        assert!(failures >= 1.0);
        Ok(())
    }
}
