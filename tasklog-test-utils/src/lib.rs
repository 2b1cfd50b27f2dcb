//! tasklog Test Utilities
//!
//! Shared test infrastructure for the tasklog workspace:
//! - Proptest generators for cells and records
//! - Fixtures: pinned clock, seeded in-memory store, sample payloads
//! - Assertions for rows and timestamps

pub use tasklog_storage::{InMemoryTabularStore, StoreCall};

pub use tasklog_core::{
    BlockRecord, CellValue, Clock, ColumnSchema, FixedClock, Row, TaskRecord, TrialRecord,
    BLOCK_SCHEMA, BLOCK_TABLE, TASK_SCHEMA, TASK_TABLE, TRIAL_SCHEMA, TRIAL_TABLE,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for cells and records.

    use super::*;
    use proptest::prelude::*;

    /// Any cell a client might send: empty, bool, integer, float or text.
    pub fn arb_cell_value() -> impl Strategy<Value = CellValue> {
        prop_oneof![
            Just(CellValue::Empty),
            any::<bool>().prop_map(CellValue::from),
            (-10_000i64..10_000).prop_map(CellValue::from),
            (-1000.0f64..1000.0).prop_map(CellValue::from),
            "[a-zA-Z0-9_ .-]{0,12}".prop_map(CellValue::from),
        ]
    }

    /// Subject ids as the task page generates them.
    pub fn arb_sub_id() -> impl Strategy<Value = String> {
        "S[0-9]{1,4}"
    }

    pub fn arb_trial_record() -> impl Strategy<Value = TrialRecord> {
        (
            arb_sub_id(),
            1i64..12,
            1i64..80,
            proptest::option::of(arb_cell_value()),
            proptest::option::of(arb_cell_value()),
        )
            .prop_map(|(sub_id, block, trial, reward, duration)| TrialRecord {
                sub_id: Some(sub_id.into()),
                block_number: Some(block.into()),
                trial_number: Some(trial.into()),
                reward_received: reward,
                trial_duration: duration,
                ..Default::default()
            })
    }

    pub fn arb_task_record() -> impl Strategy<Value = TaskRecord> {
        (arb_sub_id(), 0i64..12, proptest::option::of(arb_cell_value())).prop_map(
            |(sub_id, blocks, status)| TaskRecord {
                sub_id: Some(sub_id.into()),
                total_blocks: Some(blocks.into()),
                learner_status: status,
                ..Default::default()
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common test scenarios.

    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// The instant every fixture clock reports.
    pub fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// `fixed_instant()` rendered the way the timestamp column stores it.
    pub const FIXED_TIMESTAMP: &str = "2024-05-01T12:00:00Z";

    pub fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(fixed_instant()))
    }

    /// In-memory store with all three tables and their header rows.
    pub fn seeded_store() -> Arc<InMemoryTabularStore> {
        Arc::new(InMemoryTabularStore::with_schemas(&[
            &TRIAL_SCHEMA,
            &BLOCK_SCHEMA,
            &TASK_SCHEMA,
        ]))
    }

    pub fn sample_trial_json(sub_id: &str, trial_number: i64) -> Value {
        json!({
            "sub_id": sub_id,
            "block_number": 1,
            "block_type": "learning",
            "trial_number": trial_number,
            "trial_type": "valid",
            "left_image": "img1.png",
            "right_image": "img3.png",
            "left_right_flip": false,
            "reward_received": 1,
            "trial_start": 1714564800123i64,
            "trial_duration": 842.5,
            "pair_type": "AB"
        })
    }

    pub fn sample_block_json(sub_id: &str, block_number: i64) -> Value {
        json!({
            "sub_id": sub_id,
            "block_number": block_number,
            "block_type": "learning",
            "n_trials": 40,
            "p_img1": 0.8,
            "p_img2": 0.2,
            "reward_count": 27,
            "learner_status": "learner",
            "avg_trial_duration": 912.4,
            "std_trial_duration": 210.7
        })
    }

    pub fn sample_task_json(sub_id: &str, total_blocks: i64) -> Value {
        json!({
            "sub_id": sub_id,
            "total_blocks": total_blocks,
            "learning_blocks": total_blocks,
            "reversal_blocks": 0,
            "learner_status": "learner",
            "total_rewards": 27
        })
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over stored rows.

    use super::*;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static TIMESTAMP_PATTERN: Lazy<Option<Regex>> =
        Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").ok());

    /// Assert that a cell holds a server timestamp.
    #[track_caller]
    pub fn assert_timestamp_cell(cell: &CellValue) {
        let Some(pattern) = TIMESTAMP_PATTERN.as_ref() else {
            panic!("timestamp pattern failed to compile");
        };
        match cell {
            CellValue::Text(text) => assert!(
                pattern.is_match(text),
                "Expected a timestamp, got {:?}",
                text
            ),
            other => panic!("Expected a timestamp string, got {:?}", other),
        }
    }

    /// Assert that every data row of `table` has exactly the schema's width.
    #[track_caller]
    pub fn assert_rows_match_schema(store: &InMemoryTabularStore, schema: &ColumnSchema) {
        for (offset, row) in store.rows(schema.table()).iter().enumerate() {
            assert_eq!(
                row.len(),
                schema.len(),
                "Row {} of {} has the wrong width",
                offset + 1,
                schema.table()
            );
        }
    }

    /// Assert that exactly one row carries `sub_id` and return it.
    #[track_caller]
    pub fn single_row_for(store: &InMemoryTabularStore, table: &str, sub_id: &str) -> Row {
        let mut rows = store.rows_with_key(table, sub_id);
        assert_eq!(rows.len(), 1, "Expected one {} row for {}", table, sub_id);
        rows.remove(0)
    }
}
