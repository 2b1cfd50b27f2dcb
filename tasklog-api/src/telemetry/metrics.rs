//! Prometheus Metrics Definitions
//!
//! Store round-trip counts and latencies, plus rows written per table.
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// Store call latency buckets (seconds). Spreadsheet APIs are slow, so the
/// tail reaches further than a database's would.
const STORE_LATENCY_BUCKETS: &[f64] = &[
    0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance - initialized on first use
pub static METRICS: Lazy<ApiResult<TasklogMetrics>> = Lazy::new(TasklogMetrics::new);

#[derive(Clone)]
pub struct TasklogMetrics {
    /// Store call counter - labels: operation, table, status
    pub store_operations_total: CounterVec,

    /// Store call duration histogram - labels: operation, table
    pub store_operation_duration_seconds: HistogramVec,

    /// Rows appended or overwritten - labels: table
    pub rows_written_total: CounterVec,
}

impl TasklogMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            store_operations_total: register_counter_vec!(
                "tasklog_store_operations_total",
                "Total number of store calls",
                &["operation", "table", "status"]
            )
            .map_err(|e| {
                ApiError::internal_error(format!(
                    "Failed to register store_operations_total: {}",
                    e
                ))
            })?,

            store_operation_duration_seconds: register_histogram_vec!(
                "tasklog_store_operation_duration_seconds",
                "Store call duration in seconds",
                &["operation", "table"],
                STORE_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| {
                ApiError::internal_error(format!(
                    "Failed to register store_operation_duration_seconds: {}",
                    e
                ))
            })?,

            rows_written_total: register_counter_vec!(
                "tasklog_rows_written_total",
                "Total number of rows written to the store",
                &["table"]
            )
            .map_err(|e| {
                ApiError::internal_error(format!("Failed to register rows_written_total: {}", e))
            })?,
        })
    }

    /// Record one store call.
    pub fn record_store_operation(
        &self,
        operation: &str,
        table: &str,
        success: bool,
        duration_secs: f64,
    ) {
        let status = if success { "success" } else { "error" };
        self.store_operations_total
            .with_label_values(&[operation, table, status])
            .inc();
        self.store_operation_duration_seconds
            .with_label_values(&[operation, table])
            .observe(duration_secs);
    }

    pub fn record_rows_written(&self, table: &str, rows: usize) {
        self.rows_written_total
            .with_label_values(&[table])
            .inc_by(rows as f64);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    if let Err(e) = METRICS.as_ref() {
        tracing::warn!(error = %e, "Metrics registry unavailable");
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() -> Result<(), String> {
        let metrics = METRICS
            .as_ref()
            .map_err(|e| format!("Metrics init failed: {}", e.message))?;
        metrics.record_store_operation("append", "TrialData", true, 0.120);
        metrics.record_rows_written("TrialData", 3);

        let value = metrics
            .rows_written_total
            .with_label_values(&["TrialData"])
            .get();
        assert!(value >= 3.0);
        Ok(())
    }
}
