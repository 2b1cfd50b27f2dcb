//! Request and response bodies.

use serde::{Deserialize, Serialize};
use tasklog_core::{BlockRecord, TaskRecord, TrialRecord};

use crate::error::ErrorCode;

/// Outcome marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Error,
    PartialError,
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Body of `POST /log_trials_bulk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkTrialsRequest {
    pub trials: Vec<TrialRecord>,
}

/// Body of `POST /log_block_commit`.
///
/// A missing or null `block`/`task` skips that part; missing `trials` is an
/// empty batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockCommitRequest {
    pub trials: Vec<TrialRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskRecord>,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: ResponseStatus,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTrialsResponse {
    pub status: ResponseStatus,
    pub rows_added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCommitResponse {
    pub status: ResponseStatus,
    pub trials_added: usize,
}

/// Returned with a 500 when at least one block-commit part failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialErrorResponse {
    pub status: ResponseStatus,
    pub code: ErrorCode,
    /// One entry per failed part, prefixed `trials:`, `block:` or `task:`.
    pub errors: Vec<String>,
}

impl PartialErrorResponse {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            status: ResponseStatus::PartialError,
            code: ErrorCode::PartialFailure,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_value(ResponseStatus::Ok)?, json!("ok"));
        assert_eq!(
            serde_json::to_value(ResponseStatus::PartialError)?,
            json!("partial_error")
        );
        Ok(())
    }

    #[test]
    fn test_block_commit_request_parts_are_optional() -> Result<(), serde_json::Error> {
        let request: BlockCommitRequest = serde_json::from_value(json!({"block": null}))?;
        assert!(request.trials.is_empty());
        assert!(request.block.is_none());
        assert!(request.task.is_none());
        Ok(())
    }

    #[test]
    fn test_bulk_request_ignores_unknown_members() -> Result<(), serde_json::Error> {
        let request: BulkTrialsRequest = serde_json::from_value(json!({
            "trials": [{"sub_id": "S1", "extra": true}],
            "session": "abc"
        }))?;
        assert_eq!(request.trials.len(), 1);
        Ok(())
    }
}
