//! Observability: logging setup and execution counters

mod logging;
mod metrics;

pub use logging::{LogConfig, LogFormat, LogInitError};
pub use metrics::{MetricsSnapshot, SearchMetrics};
