//! tasklog Telemetry - Logging and Metrics
//!
//! Structured logging through `tracing` and Prometheus counters for store
//! traffic. Both work without any external collector.

pub mod instrumented;
pub mod logging;
pub mod metrics;

pub use instrumented::InstrumentedStore;
pub use logging::init_tracing;
pub use metrics::{metrics_handler, TasklogMetrics, METRICS};
