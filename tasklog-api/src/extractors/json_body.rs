//! Lenient JSON body extractor.
//!
//! The task page posts with `fetch` and sometimes with `navigator.sendBeacon`,
//! which cannot set `application/json`. The body is therefore parsed as JSON
//! whatever the declared content type, and must be a JSON object.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// A JSON object body decoded into `T`. Rejections use the error envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Failed to read body: {}", e)))?;
        decode(&bytes).map(JsonBody)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(ApiError::invalid_input("Request body must be a JSON object"));
    }
    serde_json::from_value(value).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tasklog_core::TrialRecord;

    #[test]
    fn test_decodes_object() -> Result<(), ApiError> {
        let trial: TrialRecord = decode(br#"{"sub_id": "S1", "unknown": 1}"#)?;
        assert_eq!(trial.sub_id, Some("S1".into()));
        Ok(())
    }

    #[test]
    fn test_rejects_non_object() {
        let bodies: [&[u8]; 4] = [b"[1, 2]", b"\"S1\"", b"17", b"null"];
        for body in bodies {
            let err = decode::<TrialRecord>(body).err();
            assert_eq!(err.map(|e| e.code), Some(ErrorCode::InvalidInput));
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = decode::<TrialRecord>(b"{\"sub_id\": ").err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::InvalidInput));
    }
}
