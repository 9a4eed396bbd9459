//! `tracing-subscriber` installation.
//!
//! Dispatch code only emits events. Nothing is printed until the hosting
//! process installs a subscriber with [`init_logging`]: a registry carrying
//! one `fmt` layer, rendered as JSON lines or as pretty multi-line records,
//! behind an [`EnvFilter`].
//!
//! ```rust,ignore
//! use alpinebits_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(version = "2024-10", action = "action_OTA_Ping", "Dispatched");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Install a subscriber at all.
    pub enabled: bool,
    /// `EnvFilter` directives, e.g. `alpinebits_router=debug,warn`.
    pub level: String,
    /// JSON lines instead of pretty records.
    pub json_format: bool,
    /// Emit an event when a span opens and closes.
    pub span_events: bool,
    /// Attach source file and line.
    pub file_line_info: bool,
    /// Attach the event target.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Pretty debug output with span lifecycle and source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            ..Self::production()
        }
    }

    /// JSON lines at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            include_target: true,
        }
    }

    fn span_lifecycle(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// A disabled config installs nothing and succeeds.
///
/// # Errors
///
/// [`TelemetryError::LoggingInit`] when the directives do not parse or a
/// global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }
    let filter = create_env_filter(&config.level)?;

    let fmt = tracing_subscriber::fmt::layer()
        .with_span_events(config.span_lifecycle())
        .with_file(config.file_line_info)
        .with_line_number(config.file_line_info)
        .with_target(config.include_target);
    let layer = if config.json_format {
        fmt.json().with_filter(filter).boxed()
    } else {
        fmt.pretty().with_filter(filter).boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses filter directives without installing anything.
///
/// # Errors
///
/// [`TelemetryError::LoggingInit`] naming the rejected directive string.
pub fn create_env_filter(directives: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| TelemetryError::LoggingInit(format!("directives {directives:?}: {e}")))
}
