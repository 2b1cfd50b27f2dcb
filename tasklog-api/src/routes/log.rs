//! Ingestion Endpoints
//!
//! One POST route per operation. Bodies are decoded into typed records;
//! unknown members are ignored and missing ones become empty cells.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tasklog_core::{BlockRecord, TaskRecord, TrialRecord};

use crate::error::{ApiResult, ErrorCode};
use crate::extractors::JsonBody;
use crate::service::LogService;
use crate::state::AppState;
use crate::types::{
    BlockCommitRequest, BlockCommitResponse, BulkTrialsRequest, BulkTrialsResponse,
    PartialErrorResponse, ResponseStatus, StatusResponse,
};

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /log_trial - Append one trial row
pub async fn log_trial(
    State(service): State<Arc<LogService>>,
    JsonBody(trial): JsonBody<TrialRecord>,
) -> ApiResult<Json<StatusResponse>> {
    service.log_trial(trial).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /log_trials_bulk - Append many trial rows in one store call
pub async fn log_trials_bulk(
    State(service): State<Arc<LogService>>,
    JsonBody(request): JsonBody<BulkTrialsRequest>,
) -> ApiResult<Json<BulkTrialsResponse>> {
    let rows_added = service.log_trials_bulk(request.trials).await?;
    tracing::info!(rows_added, "Logged trial batch");
    Ok(Json(BulkTrialsResponse {
        status: ResponseStatus::Ok,
        rows_added,
    }))
}

/// POST /log_block - Append one block summary row
pub async fn log_block(
    State(service): State<Arc<LogService>>,
    JsonBody(block): JsonBody<BlockRecord>,
) -> ApiResult<Json<StatusResponse>> {
    service.log_block(block).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /log_task - Insert or update the subject's task row
pub async fn log_task(
    State(service): State<Arc<LogService>>,
    JsonBody(task): JsonBody<TaskRecord>,
) -> ApiResult<Json<StatusResponse>> {
    service.upsert_task(task).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /log_block_commit - Trials, block summary and task row together
///
/// Parts fail independently. Any failure answers 500 with one tagged
/// message per failed part.
pub async fn log_block_commit(
    State(service): State<Arc<LogService>>,
    JsonBody(request): JsonBody<BlockCommitRequest>,
) -> Response {
    let outcome = service.commit_block(request).await;
    if outcome.is_success() {
        let body = BlockCommitResponse {
            status: ResponseStatus::Ok,
            trials_added: outcome.trials_added,
        };
        (StatusCode::OK, Json(body)).into_response()
    } else {
        let body = PartialErrorResponse::new(outcome.error_messages());
        (ErrorCode::PartialFailure.status_code(), Json(body)).into_response()
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/log_trial", post(log_trial))
        .route("/log_trials_bulk", post(log_trials_bulk))
        .route("/log_block", post(log_block))
        .route("/log_task", post(log_task))
        .route("/log_block_commit", post(log_block_commit))
}
