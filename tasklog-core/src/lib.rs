//! tasklog Core - Record Kinds, Column Schemas and Row Projection
//!
//! Everything in this crate is pure: no I/O, no store access. The storage
//! crate writes the rows produced here, and the API crate decodes inbound
//! payloads into the record types defined here.

pub mod cell;
pub mod clock;
pub mod error;
pub mod position;
pub mod projector;
pub mod record;
pub mod schema;

pub use cell::CellValue;
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};
pub use error::{ConfigError, ConfigResult};
pub use position::{ColumnIndex, RowPosition};
pub use projector::{ensure_timestamp, project, project_record, FieldSource, TimestampSlot};
pub use record::{BlockRecord, Record, TaskRecord, TrialRecord};
pub use schema::{
    ColumnSchema, RecordKind, BLOCK_COLUMNS, BLOCK_SCHEMA, BLOCK_TABLE, KEY_COLUMN, TASK_COLUMNS,
    TASK_SCHEMA, TASK_TABLE, TIMESTAMP_COLUMN, TRIAL_COLUMNS, TRIAL_SCHEMA, TRIAL_TABLE,
};

/// One projected row, cells in schema order.
pub type Row = Vec<CellValue>;
