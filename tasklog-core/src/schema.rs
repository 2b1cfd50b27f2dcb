//! Column Schema Registry
//!
//! Each record kind has a fixed, ordered list of columns. The order is the
//! storage contract: historical rows are read positionally, so columns may
//! only ever be appended at the end.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::position::ColumnIndex;

// ============================================================================
// TABLE NAMES
// ============================================================================

pub const TRIAL_TABLE: &str = "TrialData";
pub const BLOCK_TABLE: &str = "BlockData";
pub const TASK_TABLE: &str = "TaskData";

/// Natural key column name, always first.
pub const KEY_COLUMN: &str = "sub_id";

/// Column that receives a server timestamp when the client leaves it blank.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

// ============================================================================
// COLUMN ORDERS
// ============================================================================

pub const TRIAL_COLUMNS: &[&str] = &[
    "sub_id",
    "timestamp",
    "block_number",
    "block_type",
    "trial_number",
    "trial_type",
    "valid_win",
    "valid_lose",
    "invalid_win",
    "invalid_lose",
    "sel_img1",
    "sel_img2",
    "sel_img3",
    "sel_img4",
    "left_image",
    "right_image",
    "left_right_flip",
    "reward_received",
    "trial_start",
    "trial_duration",
    "pair_type",
];

pub const BLOCK_COLUMNS: &[&str] = &[
    "sub_id",
    "block_number",
    "block_type",
    "n_trials",
    "p_img1",
    "p_img2",
    "p_img3",
    "p_img4",
    "reward_count",
    "learner_status",
    "avg_trial_duration",
    "std_trial_duration",
    "est_img1",
    "est_img2",
    "est_img3",
    "est_img4",
];

pub const TASK_COLUMNS: &[&str] = &[
    "sub_id",
    "timestamp",
    "total_blocks",
    "learning_blocks",
    "reversal_blocks",
    "highest_reward_block",
    "learner_status",
    "total_rewards",
    "learning_rewards",
    "reversal_rewards",
    "fourth_learning_block_present",
    "avg_trial_duration_learning",
    "std_trial_duration_learning",
    "avg_trial_duration_reversal",
    "std_trial_duration_reversal",
    "avg_trial_duration_total",
    "std_trial_duration_total",
];

// ============================================================================
// COLUMN SCHEMA
// ============================================================================

/// Ordered column layout of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    table: &'static str,
    columns: &'static [&'static str],
}

impl ColumnSchema {
    pub const fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 1-based position of a named column.
    pub fn position(&self, column: &str) -> Option<ColumnIndex> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|offset| u32::try_from(offset + 1).ok())
            .and_then(ColumnIndex::new)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    /// Column holding the natural key.
    pub fn key_column(&self) -> ColumnIndex {
        ColumnIndex::FIRST
    }
}

pub static TRIAL_SCHEMA: ColumnSchema = ColumnSchema::new(TRIAL_TABLE, TRIAL_COLUMNS);
pub static BLOCK_SCHEMA: ColumnSchema = ColumnSchema::new(BLOCK_TABLE, BLOCK_COLUMNS);
pub static TASK_SCHEMA: ColumnSchema = ColumnSchema::new(TASK_TABLE, TASK_COLUMNS);

// ============================================================================
// RECORD KIND
// ============================================================================

/// Category of logged event. Each kind owns one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Trial,
    Block,
    Task,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Trial, RecordKind::Block, RecordKind::Task];

    pub fn schema(self) -> &'static ColumnSchema {
        match self {
            RecordKind::Trial => &TRIAL_SCHEMA,
            RecordKind::Block => &BLOCK_SCHEMA,
            RecordKind::Task => &TASK_SCHEMA,
        }
    }

    pub fn table(self) -> &'static str {
        self.schema().table()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Trial => "trial",
            RecordKind::Block => "block",
            RecordKind::Task => "task",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_widths() {
        assert_eq!(TRIAL_SCHEMA.len(), 21);
        assert_eq!(BLOCK_SCHEMA.len(), 16);
        assert_eq!(TASK_SCHEMA.len(), 17);
    }

    #[test]
    fn test_every_schema_is_keyed_on_sub_id() {
        for kind in RecordKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.columns()[0], KEY_COLUMN);
            assert_eq!(schema.position(KEY_COLUMN), Some(schema.key_column()));
        }
    }

    #[test]
    fn test_column_names_are_unique() {
        for kind in RecordKind::ALL {
            let columns = kind.schema().columns();
            let unique: HashSet<_> = columns.iter().collect();
            assert_eq!(unique.len(), columns.len(), "duplicate column in {}", kind);
        }
    }

    #[test]
    fn test_timestamp_columns() {
        assert!(TRIAL_SCHEMA.contains(TIMESTAMP_COLUMN));
        assert!(TASK_SCHEMA.contains(TIMESTAMP_COLUMN));
        assert!(!BLOCK_SCHEMA.contains(TIMESTAMP_COLUMN));
    }

    #[test]
    fn test_position_lookup() {
        assert_eq!(TRIAL_SCHEMA.position("timestamp").map(|c| c.get()), Some(2));
        assert_eq!(TRIAL_SCHEMA.position("pair_type").map(|c| c.get()), Some(21));
        assert!(TRIAL_SCHEMA.position("unknown").is_none());
    }

    #[test]
    fn test_tables() {
        assert_eq!(RecordKind::Trial.table(), "TrialData");
        assert_eq!(RecordKind::Block.table(), "BlockData");
        assert_eq!(RecordKind::Task.table(), "TaskData");
    }
}
