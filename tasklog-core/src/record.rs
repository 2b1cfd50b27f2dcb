//! Typed record payloads.
//!
//! Every field is optional and defaulted; unknown fields are ignored when a
//! payload is decoded. Field lists mirror the column schemas one-to-one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::projector::{FieldSource, TimestampSlot};
use crate::schema::RecordKind;

/// A decoded record of one kind.
pub trait Record: FieldSource + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;

    /// Field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Natural key value, if the client sent one.
    fn sub_id(&self) -> Option<&CellValue>;
}

/// Declares a record struct whose fields are the given columns.
macro_rules! define_record {
    ($(#[$meta:meta])* $name:ident, $kind:expr, [$($field:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<CellValue>,
            )+
        }

        impl FieldSource for $name {
            fn field(&self, column: &str) -> Option<CellValue> {
                match column {
                    $(stringify!($field) => self.$field.clone(),)+
                    _ => None,
                }
            }
        }

        impl Record for $name {
            const KIND: RecordKind = $kind;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn sub_id(&self) -> Option<&CellValue> {
                self.sub_id.as_ref()
            }
        }
    };
}

/// Implements [`TimestampSlot`] for a record with a `timestamp` field.
macro_rules! impl_timestamp_slot {
    ($name:ident) => {
        impl TimestampSlot for $name {
            fn timestamp(&self) -> Option<CellValue> {
                self.timestamp.clone()
            }

            fn set_timestamp(&mut self, value: CellValue) {
                self.timestamp = Some(value);
            }
        }
    };
}

define_record!(
    /// One experimental trial.
    TrialRecord,
    RecordKind::Trial,
    [
        sub_id,
        timestamp,
        block_number,
        block_type,
        trial_number,
        trial_type,
        valid_win,
        valid_lose,
        invalid_win,
        invalid_lose,
        sel_img1,
        sel_img2,
        sel_img3,
        sel_img4,
        left_image,
        right_image,
        left_right_flip,
        reward_received,
        trial_start,
        trial_duration,
        pair_type,
    ]
);

define_record!(
    /// Summary of one completed block.
    BlockRecord,
    RecordKind::Block,
    [
        sub_id,
        block_number,
        block_type,
        n_trials,
        p_img1,
        p_img2,
        p_img3,
        p_img4,
        reward_count,
        learner_status,
        avg_trial_duration,
        std_trial_duration,
        est_img1,
        est_img2,
        est_img3,
        est_img4,
    ]
);

define_record!(
    /// Cumulative summary of a subject's whole task. One row per subject.
    TaskRecord,
    RecordKind::Task,
    [
        sub_id,
        timestamp,
        total_blocks,
        learning_blocks,
        reversal_blocks,
        highest_reward_block,
        learner_status,
        total_rewards,
        learning_rewards,
        reversal_rewards,
        fourth_learning_block_present,
        avg_trial_duration_learning,
        std_trial_duration_learning,
        avg_trial_duration_reversal,
        std_trial_duration_reversal,
        avg_trial_duration_total,
        std_trial_duration_total,
    ]
);

impl_timestamp_slot!(TrialRecord);
impl_timestamp_slot!(TaskRecord);
