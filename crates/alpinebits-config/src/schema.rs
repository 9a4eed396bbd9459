//! Sections of [`AlpineBitsConfig`](crate::AlpineBitsConfig).

use alpinebits_core::Version;
use serde::{Deserialize, Serialize};

/// `[dispatch]`: which requests reach the router and how failures surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Served versions; anything else fails before route lookup.
    #[serde(default = "default_enabled_versions")]
    pub enabled_versions: Vec<Version>,

    /// Store chain failures under the captured-error key and answer `Ok`.
    #[serde(default = "default_true")]
    pub capture_errors: bool,

    /// Keep internal messages in captured errors instead of a generic text.
    #[serde(default)]
    pub expose_internal_errors: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            enabled_versions: default_enabled_versions(),
            capture_errors: true,
            expose_internal_errors: false,
        }
    }
}

impl DispatchConfig {
    /// Whether requests for `version` are served.
    #[must_use]
    pub fn is_enabled(&self, version: &str) -> bool {
        self.enabled_versions.iter().any(|v| v.as_str() == version)
    }
}

fn default_enabled_versions() -> Vec<Version> {
    Version::known().to_vec()
}

/// Rendering of log records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line records for a terminal.
    Pretty,
}

/// `[logging]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Install a subscriber.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `EnvFilter` directives.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output shape.
    #[serde(default)]
    pub format: LogFormat,

    /// Attach file and line to each record.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl From<&LoggingConfig> for alpinebits_telemetry::LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            span_events: config.format == LogFormat::Pretty,
            file_line_info: config.include_location,
            include_target: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[metrics]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Record metrics.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Upper bounds of the dispatch duration histogram, in seconds.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: default_duration_buckets(),
        }
    }
}

impl From<&MetricsConfig> for alpinebits_telemetry::MetricsConfig {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            enabled: config.enabled,
            duration_buckets: config.duration_buckets.clone(),
        }
    }
}

fn default_duration_buckets() -> Vec<f64> {
    alpinebits_telemetry::MetricsConfig::default().duration_buckets
}

fn default_true() -> bool {
    true
}
