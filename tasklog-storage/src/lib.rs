//! tasklog Storage - Tabular Store Trait and Backends
//!
//! Defines the [`TabularStore`] abstraction over a remote spreadsheet-like
//! store, the Google Sheets backend, and an in-memory implementation for
//! tests. On top of the trait sit the two components the request layer
//! composes: [`BatchWriter`] for mutations and [`UpsertLocator`] for
//! natural-key lookups.

pub mod a1;
pub mod error;
pub mod locator;
pub mod memory;
pub mod sheets;
pub mod store;
pub mod writer;

pub use a1::{column_label, column_range, quote_table, row_range};
pub use error::{StoreError, StoreResult};
pub use locator::{Located, UpsertLocator};
pub use memory::{InMemoryTabularStore, StoreCall};
pub use sheets::{ServiceAccountKey, SheetsConfig, SheetsStore, SpreadsheetRef};
pub use store::TabularStore;
pub use writer::BatchWriter;
