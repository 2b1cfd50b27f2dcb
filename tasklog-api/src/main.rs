//! tasklog API Server Entry Point
//!
//! Loads configuration, connects to the spreadsheet and starts the Axum
//! HTTP server.

use std::sync::Arc;

use axum::Router;
use tasklog_api::telemetry::{init_tracing, InstrumentedStore};
use tasklog_api::{create_router, ApiConfig, ApiError, ApiResult, AppState, LogService};
use tasklog_storage::{SheetsConfig, SheetsStore, TabularStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env()?;
    init_tracing(api_config.log_format)?;

    // Missing credentials or spreadsheet identity stop the process here,
    // before anything binds.
    let sheets_config = SheetsConfig::from_env()?;
    let sheets = SheetsStore::connect(sheets_config).await?;
    let backend = sheets.backend_name();
    let store: Arc<dyn TabularStore> = Arc::new(InstrumentedStore::new(Arc::new(sheets)));

    let service = Arc::new(LogService::new(store));
    let app: Router = create_router(AppState::new(service, backend), &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, static_dir = %api_config.static_dir.display(), "Starting tasklog API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
