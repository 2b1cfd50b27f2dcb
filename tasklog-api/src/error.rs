//! Error Types for the tasklog API
//!
//! This module defines error handling for the HTTP layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation producing the `status` envelope
//!
//! Every error body has the shape `{"status": "error", "code": ..., "message": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tasklog_core::ConfigError;
use tasklog_storage::StoreError;

use crate::types::ResponseStatus;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each code maps to one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (400)
    // ========================================================================
    /// Request body is not a JSON value of the expected shape
    InvalidInput,

    // ========================================================================
    // Store Errors (500, 504)
    // ========================================================================
    /// The backing store rejected or failed the operation
    StoreFailure,

    /// The store did not answer in time; the write may or may not have landed
    StoreTimeout,

    /// Some sub-operations of a combined request failed
    PartialFailure,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Process configuration is missing or invalid
    ConfigurationError,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::StoreTimeout => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::StoreFailure
            | ErrorCode::PartialFailure
            | ErrorCode::ConfigurationError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error returned by every endpoint that fails as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a StoreFailure error.
    pub fn store_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreFailure, message)
    }

    /// Create an InternalError error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Wire shape of an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: ResponseStatus,
    pub code: ErrorCode,
    pub message: String,
}

impl From<ApiError> for ErrorBody {
    fn from(err: ApiError) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: err.code,
            message: err.message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody::from(self))).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(
            error = %err,
            outcome_unknown = err.outcome_unknown(),
            "Store operation failed"
        );
        match err {
            StoreError::Timeout { .. } => ApiError::new(ErrorCode::StoreTimeout, err.to_string()),
            StoreError::LockPoisoned => ApiError::internal_error(err.to_string()),
            other => ApiError::store_failure(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigurationError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::StoreFailure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::StoreTimeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ErrorCode::PartialFailure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&ErrorCode::InvalidInput)?, "\"INVALID_INPUT\"");
        assert_eq!(serde_json::to_string(&ErrorCode::StoreTimeout)?, "\"STORE_TIMEOUT\"");
        Ok(())
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = ApiError::from(StoreError::Timeout {
            operation: "append".to_string(),
        });
        assert_eq!(err.code, ErrorCode::StoreTimeout);
        assert!(err.message.contains("outcome unknown"));
    }

    #[test]
    fn test_store_error_keeps_message() {
        let err = ApiError::from(StoreError::Quota {
            reason: "write requests per minute".to_string(),
        });
        assert_eq!(err.code, ErrorCode::StoreFailure);
        assert!(err.message.contains("write requests per minute"));
    }

    #[test]
    fn test_error_body_envelope() -> Result<(), serde_json::Error> {
        let body = ErrorBody::from(ApiError::invalid_input("expected an object"));
        let json = serde_json::to_value(&body)?;
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(json["message"], "expected an object");
        Ok(())
    }

    #[test]
    fn test_config_error_conversion() {
        let err = ApiError::from(ConfigError::missing("SHEET_ID or SHEET_NAME"));
        assert_eq!(err.code, ErrorCode::ConfigurationError);
    }
}
