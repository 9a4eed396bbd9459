//! Logging and metrics for the AlpineBits dispatch engine.
//!
//! Every crate of the engine reports through the `tracing` and `metrics`
//! facades only. Both stay silent until the hosting process installs a
//! subscriber and a recorder, either together through [`init_telemetry`] or
//! one at a time through [`init_logging`] and [`init_metrics`].
//!
//! ```rust,ignore
//! use alpinebits_telemetry::{init_telemetry, LogConfig, TelemetryConfig};
//!
//! let config = TelemetryConfig::new("alpinebits-server")
//!     .with_logging(LogConfig::development());
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};
pub use self::metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result of a telemetry setup call.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Installs the subscriber, then the recorder.
///
/// # Errors
///
/// Stops at the first subsystem that fails and returns its error.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;
    tracing::info!(service = %config.service_name, "Telemetry installed");
    Ok(())
}
