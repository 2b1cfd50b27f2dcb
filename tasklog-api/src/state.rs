//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use crate::service::LogService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LogService>,
    /// Name of the store backend, reported by the health endpoints.
    pub backend: &'static str,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<LogService>, backend: &'static str) -> Self {
        Self {
            service,
            backend,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<LogService>, service);
