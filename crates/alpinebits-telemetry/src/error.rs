//! Setup failures.

use thiserror::Error;

/// Why telemetry could not be installed.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The Prometheus recorder was rejected.
    #[error("metrics recorder not installed: {0}")]
    MetricsInit(String),

    /// The global subscriber was rejected.
    #[error("log subscriber not installed: {0}")]
    LoggingInit(String),

    /// A setting cannot be used as given.
    #[error("bad telemetry setting: {0}")]
    InvalidConfig(String),
}
