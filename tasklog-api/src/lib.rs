//! tasklog API - HTTP Ingestion Layer
//!
//! Accepts trial, block and task records from the browser task over JSON
//! POSTs and writes them as rows of a spreadsheet-like store. Built with
//! Axum; the store is any [`tasklog_storage::TabularStore`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod locks;
pub mod macros;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod types;

pub use config::{ApiConfig, LogFormat};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorCode};
pub use locks::{SubjectGuard, SubjectLocks};
pub use routes::create_router;
pub use service::{BlockCommitOutcome, CommitPart, LogService, PartFailure, UpsertOutcome};
pub use state::AppState;
pub use types::{
    BlockCommitRequest, BlockCommitResponse, BulkTrialsRequest, BulkTrialsResponse,
    PartialErrorResponse, ResponseStatus, StatusResponse,
};
