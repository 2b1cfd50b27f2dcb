//! Service-account authentication.
//!
//! Access tokens come from the OAuth JWT bearer grant: an RS256 assertion
//! signed with the service account's private key is exchanged at the
//! credential's token URI. Tokens are cached and refreshed a minute before
//! they expire.

use std::time::{Duration, Instant};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tasklog_core::{ConfigError, ConfigResult};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for the access token.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// The parts of a service-account JSON key that token minting needs.
#[derive(Debug)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
    private_key: SecretString,
}

#[derive(Deserialize)]
struct RawServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn new(client_email: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        let pem: String = private_key_pem.into();
        Self {
            client_email: client_email.into(),
            private_key_id: None,
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            private_key: SecretString::new(pem.into_boxed_str()),
        }
    }

    /// Parse the JSON key file content downloaded from the cloud console.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let raw: RawServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| ConfigError::invalid("GOOGLE_CREDENTIALS_JSON", e.to_string()))?;
        Ok(Self {
            client_email: raw.client_email,
            private_key_id: raw.private_key_id,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            private_key: SecretString::new(raw.private_key.into_boxed_str()),
        })
    }

    /// Signed assertion for the JWT bearer grant, issued at `issued_at`.
    pub fn assertion(&self, issued_at: i64) -> StoreResult<String> {
        let scope = SCOPES.join(" ");
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: &scope,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes())
            .map_err(|e| StoreError::Auth {
                reason: format!("invalid service account private key: {}", e),
            })?;
        encode(&header, &claims, &key).map_err(|e| StoreError::Auth {
            reason: format!("failed to sign token assertion: {}", e),
        })
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Mints and caches access tokens for one service account.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            http,
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A valid bearer token, fetching a new one when the cached one is stale.
    ///
    /// The lock is held across the refresh so concurrent requests share one
    /// token exchange.
    pub async fn access_token(&self) -> StoreResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token().await?;
        let value = token.access_token.clone();
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Refreshed store access token"
        );
        Ok(value)
    }

    async fn fetch_token(&self) -> StoreResult<TokenResponse> {
        let assertion = self.key.assertion(chrono::Utc::now().timestamp())?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| map_reqwest_error("token exchange", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error("token exchange", e))?;
        if !status.is_success() {
            return Err(StoreError::Auth {
                reason: format!("token endpoint returned {}: {}", status.as_u16(), body),
            });
        }
        serde_json::from_str(&body)
            .map_err(|e| StoreError::malformed(format!("token response: {}", e)))
    }
}

/// Translate a transport-level failure, keeping timeouts distinct.
pub(crate) fn map_reqwest_error(operation: &str, err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout {
            operation: operation.to_string(),
        }
    } else {
        StoreError::transport(format!("{}: {}", operation, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults_token_uri() -> ConfigResult<()> {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b.iam.gserviceaccount.com", "private_key": "pem"}"#,
        )?;
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        assert_eq!(key.private_key_id, None);
        Ok(())
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key = ServiceAccountKey::new("a@b.iam.gserviceaccount.com", "super-secret-pem");
        assert!(!format!("{:?}", key).contains("super-secret-pem"));
    }

    #[test]
    fn test_missing_email_is_config_error() {
        let err = ServiceAccountKey::from_json(r#"{"private_key": "pem"}"#);
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_bad_pem_is_auth_error() {
        let key = ServiceAccountKey::new("a@b.iam.gserviceaccount.com", "not a pem");
        assert!(matches!(key.assertion(0), Err(StoreError::Auth { .. })));
    }
}
