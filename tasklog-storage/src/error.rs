//! Store errors.
//!
//! Every fault talking to or operating on the remote table ends up here.
//! Nothing in the storage layer retries; the caller decides.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store transport error: {reason}")]
    Transport { reason: String },

    #[error("Store request timed out during {operation}; outcome unknown")]
    Timeout { operation: String },

    #[error("Store authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Store permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Not found in store: {what}")]
    NotFound { what: String },

    #[error("Store quota exceeded: {reason}")]
    Quota { reason: String },

    #[error("Store API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed store response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Row for {table} has {actual} cells, expected {expected}")]
    RowWidth {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Injected fault on {table}: {message}")]
    Injected { table: String, message: String },
}

impl StoreError {
    pub fn transport(reason: impl Into<String>) -> Self {
        StoreError::Transport {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        StoreError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound { what: what.into() }
    }

    /// Map an HTTP error status from the store API onto a variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => StoreError::Auth { reason: message },
            403 => StoreError::PermissionDenied { reason: message },
            404 => StoreError::NotFound { what: message },
            429 => StoreError::Quota { reason: message },
            _ => StoreError::Api { status, message },
        }
    }

    /// A timed-out call may or may not have been applied by the store.
    pub fn outcome_unknown(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(StoreError::from_status(401, "x"), StoreError::Auth { .. }));
        assert!(matches!(
            StoreError::from_status(403, "x"),
            StoreError::PermissionDenied { .. }
        ));
        assert!(matches!(StoreError::from_status(404, "x"), StoreError::NotFound { .. }));
        assert!(matches!(StoreError::from_status(429, "x"), StoreError::Quota { .. }));
        assert_eq!(
            StoreError::from_status(400, "Unable to parse range"),
            StoreError::Api {
                status: 400,
                message: "Unable to parse range".to_string()
            }
        );
    }

    #[test]
    fn test_timeout_message_flags_unknown_outcome() {
        let err = StoreError::Timeout {
            operation: "append".to_string(),
        };
        assert!(err.outcome_unknown());
        assert!(err.to_string().contains("outcome unknown"));
        assert!(!StoreError::transport("reset").outcome_unknown());
    }
}
