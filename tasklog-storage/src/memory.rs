//! In-memory tabular store for tests.
//!
//! Behaves like a worksheet: tables must exist before they are written,
//! rows are addressed from 1 with the header counted, and a write past the
//! end pads with empty rows. Faults can be injected per table, and every
//! call is recorded so tests can assert round-trip counts.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use tasklog_core::{CellValue, ColumnIndex, ColumnSchema, Row, RowPosition};

use crate::error::{StoreError, StoreResult};
use crate::store::TabularStore;

/// One recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Append { table: String, rows: usize },
    Write { table: String, position: RowPosition },
    ReadColumn { table: String, column: ColumnIndex },
}

impl StoreCall {
    pub fn table(&self) -> &str {
        match self {
            StoreCall::Append { table, .. }
            | StoreCall::Write { table, .. }
            | StoreCall::ReadColumn { table, .. } => table,
        }
    }
}

/// In-memory store with per-table fault injection.
#[derive(Debug, Default)]
pub struct InMemoryTabularStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    faults: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<StoreCall>>,
    latency: Option<Duration>,
}

impl InMemoryTabularStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with one table per schema, each seeded with its header row.
    pub fn with_schemas(schemas: &[&ColumnSchema]) -> Self {
        let store = Self::new();
        for schema in schemas {
            let header = schema.columns().iter().map(|c| CellValue::from(*c)).collect();
            store.insert_table(schema.table(), vec![header]);
        }
        store
    }

    /// Delay every call by `latency` before it touches the tables.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Create or replace a table with the given rows.
    pub fn insert_table(&self, table: &str, rows: Vec<Row>) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table.to_string(), rows);
        }
    }

    /// Make every subsequent call touching `table` fail.
    pub fn fail_table(&self, table: &str, message: &str) {
        if let Ok(mut faults) = self.faults.write() {
            faults.insert(table.to_string(), message.to_string());
        }
    }

    pub fn clear_fault(&self, table: &str) {
        if let Ok(mut faults) = self.faults.write() {
            faults.remove(table);
        }
    }

    /// Snapshot of a table's rows, header included.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(table).cloned())
            .unwrap_or_default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.rows(table).len()
    }

    /// Rows whose first cell renders as `key`.
    pub fn rows_with_key(&self, table: &str, key: &str) -> Vec<Row> {
        self.rows(table)
            .into_iter()
            .filter(|row| row.first().map(CellValue::key_text).as_deref() == Some(key))
            .collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of append calls made against `table`.
    pub fn append_calls(&self, table: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Append { .. }) && c.table() == table)
            .count()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn record(&self, call: StoreCall) -> StoreResult<()> {
        let table = call.table().to_string();
        self.calls
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(call);

        let faults = self.faults.read().map_err(|_| StoreError::LockPoisoned)?;
        match faults.get(&table) {
            Some(message) => Err(StoreError::Injected {
                table,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn missing_table(table: &str) -> StoreError {
    StoreError::not_found(format!("worksheet {}", table))
}

#[async_trait]
impl TabularStore for InMemoryTabularStore {
    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        self.simulate_latency().await;
        self.record(StoreCall::Append {
            table: table.to_string(),
            rows: rows.len(),
        })?;

        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let existing = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        existing.extend(rows.iter().cloned());
        Ok(())
    }

    async fn write_row(&self, table: &str, position: RowPosition, row: &Row) -> StoreResult<()> {
        self.simulate_latency().await;
        self.record(StoreCall::Write {
            table: table.to_string(),
            position,
        })?;

        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let existing = tables.get_mut(table).ok_or_else(|| missing_table(table))?;

        let offset = position.offset();
        if existing.len() <= offset {
            existing.resize(offset + 1, Vec::new());
        }
        let target = &mut existing[offset];
        if target.len() < row.len() {
            target.resize(row.len(), CellValue::Empty);
        }
        target[..row.len()].clone_from_slice(row);
        Ok(())
    }

    async fn read_column(&self, table: &str, column: ColumnIndex) -> StoreResult<Vec<CellValue>> {
        self.simulate_latency().await;
        self.record(StoreCall::ReadColumn {
            table: table.to_string(),
            column,
        })?;

        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        let rows = tables.get(table).ok_or_else(|| missing_table(table))?;
        Ok(rows
            .iter()
            .map(|row| row.get(column.offset()).cloned().unwrap_or_default())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
