//! Route assembly.
//!
//! Ingestion endpoints at the root, health under `/health`, Prometheus
//! metrics at `/metrics`, and the task page's static assets.

pub mod health;
pub mod log;

use std::path::Path;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::state::AppState;
use crate::telemetry::metrics_handler;

/// Build the full application router.
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .merge(log::create_router())
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .merge(static_routes(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// `/` serves the task page; `/static` and `/images` serve its assets.
fn static_routes(dir: &Path) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .nest_service("/static", ServeDir::new(dir))
        .nest_service("/images", ServeDir::new(dir.join("images")))
}

/// Build the CORS layer from ApiConfig.
///
/// Empty origins allow any origin.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricting origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        cors.allow_origin(origins)
    }
}
