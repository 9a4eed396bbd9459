//! The root configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DispatchConfig, LogFormat, LoggingConfig, MetricsConfig};
use alpinebits_telemetry::TelemetryConfig;

/// Complete AlpineBits engine configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use alpinebits_config::AlpineBitsConfig;
///
/// let config = AlpineBitsConfig::default();
/// assert!(config.dispatch.is_enabled("2024-10"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AlpineBitsConfig {
    /// Name reported in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Dispatch configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for AlpineBitsConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

fn default_service_name() -> String {
    "alpinebits".to_string()
}

impl AlpineBitsConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::invalid("service_name", "must not be empty"));
        }

        let versions = &self.dispatch.enabled_versions;
        if versions.is_empty() {
            return Err(ConfigError::invalid(
                "dispatch.enabled_versions",
                "at least one version must be enabled",
            ));
        }
        for (i, version) in versions.iter().enumerate() {
            if version.as_str().trim().is_empty() {
                return Err(ConfigError::invalid(
                    "dispatch.enabled_versions",
                    "versions must not be empty",
                ));
            }
            if versions[..i].contains(version) {
                return Err(ConfigError::invalid(
                    "dispatch.enabled_versions",
                    format!("version {version} is listed twice"),
                ));
            }
        }

        if self.logging.enabled {
            alpinebits_telemetry::logging::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid("logging.level", e.to_string()))?;
        }

        if self.metrics.enabled {
            let buckets = &self.metrics.duration_buckets;
            if buckets.is_empty() {
                return Err(ConfigError::invalid(
                    "metrics.duration_buckets",
                    "must not be empty",
                ));
            }
            if buckets.iter().any(|b| !b.is_finite() || *b <= 0.0)
                || buckets.windows(2).any(|w| w[0] >= w[1])
            {
                return Err(ConfigError::invalid(
                    "metrics.duration_buckets",
                    "must be positive and strictly increasing",
                ));
            }
        }

        Ok(())
    }

    /// Local development preset: pretty debug logs, internal errors shown.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config.dispatch.expose_internal_errors = true;
        config
    }

    /// Production preset: JSON info logs, internal errors masked.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.dispatch.expose_internal_errors = false;
        config
    }

    /// Telemetry settings for [`alpinebits_telemetry::init_telemetry`].
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig::new(self.service_name.clone())
            .with_logging((&self.logging).into())
            .with_metrics((&self.metrics).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::Version;

    #[test]
    fn test_default_is_valid() {
        assert!(AlpineBitsConfig::default().validate().is_ok());
        assert!(AlpineBitsConfig::development().validate().is_ok());
        assert!(AlpineBitsConfig::production().validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = AlpineBitsConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert!(dev.dispatch.expose_internal_errors);

        let prod = AlpineBitsConfig::production();
        assert_eq!(prod.logging.format, LogFormat::Json);
        assert!(!prod.dispatch.expose_internal_errors);
    }

    #[test]
    fn test_no_enabled_versions_rejected() {
        let mut config = AlpineBitsConfig::default();
        config.dispatch.enabled_versions.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dispatch.enabled_versions"));
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let mut config = AlpineBitsConfig::default();
        config.dispatch.enabled_versions = vec![Version::V_2024_10, Version::new("2024-10")];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AlpineBitsConfig::default();
        config.logging.level = "alpinebits=loudest".to_string();
        assert!(config.validate().is_err());

        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unordered_buckets_rejected() {
        let mut config = AlpineBitsConfig::default();
        config.metrics.duration_buckets = vec![0.1, 0.05];
        assert!(config.validate().is_err());

        config.metrics.duration_buckets = vec![0.0, 0.1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_telemetry_settings() {
        let config = AlpineBitsConfig::development();
        let telemetry = config.telemetry();
        assert_eq!(telemetry.service_name, "alpinebits");
        assert!(!telemetry.logging.json_format);
        assert!(telemetry.metrics.enabled);
    }
}
