//! API Configuration Module
//!
//! Bind address, static asset location, CORS and log output. Loaded from
//! environment variables with defaults suited to running next to the task
//! page during development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tasklog_core::{ConfigError, ConfigResult};

pub const DEFAULT_PORT: u16 = 5005;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::invalid(
                "TASKLOG_LOG_FORMAT",
                format!("expected json or pretty, got {}", other),
            )),
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host or IP to bind.
    pub bind_host: String,

    pub port: u16,

    /// Directory holding `index.html` and the task assets.
    pub static_dir: PathBuf,

    /// Allowed CORS origins. Empty means allow all origins.
    pub cors_origins: Vec<String>,

    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            cors_origins: Vec::new(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TASKLOG_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT`: Listen port (default: 5005)
    /// - `TASKLOG_STATIC_DIR`: Static asset directory (default: static)
    /// - `TASKLOG_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TASKLOG_LOG_FORMAT`: "json" or "pretty" (default: pretty)
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", e.to_string()))?,
            None => defaults.port,
        };

        let cors_origins = non_empty("TASKLOG_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_format = match non_empty("TASKLOG_LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            bind_host: non_empty("TASKLOG_API_BIND").unwrap_or(defaults.bind_host),
            port,
            static_dir: non_empty("TASKLOG_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            cors_origins,
            log_format,
        })
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> ConfigResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("TASKLOG_API_BIND", format!("{}: {}", addr, e)))
    }
}
