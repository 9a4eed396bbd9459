//! Combined settings for [`init_telemetry`](crate::init_telemetry).

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings of one hosting process.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Name reported in the startup event.
    pub service_name: String,
    /// Subscriber settings.
    pub logging: LogConfig,
    /// Recorder settings.
    pub metrics: MetricsConfig,
}

impl TelemetryConfig {
    /// Settings for `service_name` with default logging and metrics.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            logging: LogConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }

    /// Settings that install neither a subscriber nor a recorder.
    #[must_use]
    pub fn silent(service_name: impl Into<String>) -> Self {
        let mut config = Self::new(service_name);
        config.logging.enabled = false;
        config.metrics.enabled = false;
        config
    }

    /// Replaces the logging settings.
    #[must_use]
    pub fn with_logging(self, logging: LogConfig) -> Self {
        Self { logging, ..self }
    }

    /// Replaces the metrics settings.
    #[must_use]
    pub fn with_metrics(self, metrics: MetricsConfig) -> Self {
        Self { metrics, ..self }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new("alpinebits")
    }
}
