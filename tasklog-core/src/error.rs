//! Error types shared across tasklog crates

use thiserror::Error;

/// Configuration errors raised while reading process configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn missing(field: impl Into<String>) -> Self {
        ConfigError::MissingRequired {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::missing("GOOGLE_CREDENTIALS_JSON");
        assert_eq!(
            err.to_string(),
            "Missing required configuration: GOOGLE_CREDENTIALS_JSON"
        );

        let err = ConfigError::invalid("PORT", "not a number");
        assert!(err.to_string().contains("PORT"));
        assert!(err.to_string().contains("not a number"));
    }
}
