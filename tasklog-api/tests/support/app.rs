//! Router fixture backed by the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tasklog_api::{create_router, ApiConfig, AppState, LogService};
use tasklog_test_utils::fixtures::{fixed_clock, seeded_store};
use tasklog_test_utils::InMemoryTabularStore;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryTabularStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(&ApiConfig::default())
    }

    pub fn with_config(config: &ApiConfig) -> Self {
        let store = seeded_store();
        let service = Arc::new(LogService::with_clock(store.clone(), fixed_clock()));
        let router = create_router(AppState::new(service, "memory"), config);
        Self { router, store }
    }

    /// POST a raw body with the given content type.
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Result<(StatusCode, Value), String> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .map_err(|e| e.to_string())?;
        let (status, bytes) = self.send(request).await?;
        let json = serde_json::from_slice(&bytes)
            .map_err(|e| format!("Response is not JSON ({}): {:?}", e, bytes))?;
        Ok((status, json))
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<(StatusCode, Value), String> {
        self.post_raw(path, "application/json", body.to_string())
            .await
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Vec<u8>), String> {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .map_err(|e| e.to_string())?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Vec<u8>), String> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| format!("Failed to read body: {:?}", e))?;
        Ok((status, bytes.to_vec()))
    }
}
