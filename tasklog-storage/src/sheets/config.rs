//! Sheets backend configuration.

use std::time::Duration;

use tasklog_core::{ConfigError, ConfigResult};

use super::auth::ServiceAccountKey;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// How the spreadsheet is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// The long id from the spreadsheet URL.
    Id(String),
    /// Title, resolved to an id through Drive at startup.
    Name(String),
}

#[derive(Debug)]
pub struct SheetsConfig {
    pub credentials: ServiceAccountKey,
    pub spreadsheet: SpreadsheetRef,
    pub timeout: Duration,
    pub sheets_base_url: String,
    pub drive_base_url: String,
}

impl SheetsConfig {
    pub fn new(credentials: ServiceAccountKey, spreadsheet: SpreadsheetRef) -> Self {
        Self {
            credentials,
            spreadsheet,
            timeout: Duration::from_secs(30),
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            drive_base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
        }
    }

    /// Load from environment variables.
    ///
    /// Environment variables:
    /// - `GOOGLE_CREDENTIALS_JSON`: service-account JSON (required)
    /// - `SHEET_ID` or `SHEET_NAME`: spreadsheet identity (one required, id wins)
    /// - `TASKLOG_STORE_TIMEOUT_SECS`: per-request timeout (default: 30)
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials_json = non_empty("GOOGLE_CREDENTIALS_JSON")
            .ok_or_else(|| ConfigError::missing("GOOGLE_CREDENTIALS_JSON"))?;
        let credentials = ServiceAccountKey::from_json(&credentials_json)?;

        let spreadsheet = match (non_empty("SHEET_ID"), non_empty("SHEET_NAME")) {
            (Some(id), _) => SpreadsheetRef::Id(id),
            (None, Some(name)) => SpreadsheetRef::Name(name),
            (None, None) => return Err(ConfigError::missing("SHEET_ID or SHEET_NAME")),
        };

        let timeout = match non_empty("TASKLOG_STORE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::invalid("TASKLOG_STORE_TIMEOUT_SECS", e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30),
        };

        Ok(Self {
            timeout,
            ..Self::new(credentials, spreadsheet)
        })
    }
}
