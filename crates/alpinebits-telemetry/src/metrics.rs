//! Prometheus-format metrics for the dispatch engine.
//!
//! Metrics are recorded through the `metrics` facade and are no-ops until a
//! recorder is installed. [`init_metrics`] installs a Prometheus recorder
//! without an HTTP listener; the transport serves [`render_metrics`] on
//! whatever endpoint it exposes.
//!
//! # Series
//!
//! | Name | Kind | Labels | Counts |
//! |---|---|---|---|
//! | `alpinebits_dispatch_total` | Counter | `version`, `action`, `outcome` | Dispatched requests |
//! | `alpinebits_dispatch_duration_seconds` | Histogram | `version`, `action` | Chain execution time |
//! | `alpinebits_handshake_total` | Counter | `outcome` | Handshake negotiations |
//! | `alpinebits_validation_failures_total` | Counter | `version` | Rejected documents |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Metric names.
pub mod names {
    /// Dispatched requests.
    pub const DISPATCH_TOTAL: &str = "alpinebits_dispatch_total";
    /// Chain execution time.
    pub const DISPATCH_DURATION_SECONDS: &str = "alpinebits_dispatch_duration_seconds";
    /// Handshake negotiations.
    pub const HANDSHAKE_TOTAL: &str = "alpinebits_handshake_total";
    /// Rejected documents.
    pub const VALIDATION_FAILURES_TOTAL: &str = "alpinebits_validation_failures_total";
}

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Recorder settings.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Install a recorder at all.
    pub enabled: bool,

    /// Histogram buckets for dispatch duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // 100µs .. 1s: chains run in-process, transports add their own latency.
            duration_buckets: vec![
                0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] for an empty bucket list and
/// [`TelemetryError::MetricsInit`] if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }
    if config.duration_buckets.is_empty() {
        return Err(TelemetryError::InvalidConfig(
            "duration_buckets must not be empty".to_string(),
        ));
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::DISPATCH_DURATION_SECONDS.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = PROMETHEUS.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Current values in the Prometheus text exposition format.
///
/// Returns `None` if [`init_metrics`] has not installed a recorder.
#[must_use]
pub fn render_metrics() -> Option<String> {
    PROMETHEUS.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(names::DISPATCH_TOTAL, "Total number of dispatched requests");
    describe_histogram!(
        names::DISPATCH_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Chain execution time in seconds"
    );
    describe_counter!(names::HANDSHAKE_TOTAL, "Total number of handshake negotiations");
    describe_counter!(
        names::VALIDATION_FAILURES_TOTAL,
        "Total number of documents rejected by validation"
    );
}

/// Records a dispatched request.
///
/// `outcome` is `ok` or an error category name.
pub fn record_dispatch(version: &str, action: &str, outcome: &str, duration: Duration) {
    counter!(
        names::DISPATCH_TOTAL,
        "version" => version.to_string(),
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::DISPATCH_DURATION_SECONDS,
        "version" => version.to_string(),
        "action" => action.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a handshake negotiation.
///
/// `outcome` is `match`, `no_match` or `invalid`.
pub fn record_handshake(outcome: &str) {
    counter!(names::HANDSHAKE_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Records a document rejected by validation.
pub fn record_validation_failure(version: &str) {
    counter!(names::VALIDATION_FAILURES_TOTAL, "version" => version.to_string()).increment(1);
}
