//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::{AlpineBitsConfig, ConfigError, LogFormat};
use alpinebits_core::Version;

/// Configuration loader.
///
/// Layers are applied in order, later layers overriding earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// The result is validated by [`ConfigLoader::load`].
///
/// # Example
///
/// ```no_run
/// use alpinebits_config::ConfigLoader;
///
/// # fn main() -> Result<(), alpinebits_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("alpinebits.toml")?
///     .with_env_prefix("ALPINEBITS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: AlpineBitsConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AlpineBitsConfig::default(),
            env_prefix: None,
        }
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = AlpineBitsConfig::default();
        self
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = AlpineBitsConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = AlpineBitsConfig::production();
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`. Unknown fields
    /// are rejected.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::missing(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        self.config = match extension.as_deref() {
            Some(format @ ("toml" | "json")) => parse(&content, format)?,
            _ => return Err(ConfigError::Format(path.display().to_string())),
        };

        Ok(self)
    }

    /// Loads configuration from a file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or
    /// `json`).
    ///
    /// ```
    /// use alpinebits_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [dispatch]
    ///     enabled_versions = ["2024-10"]
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(!config.dispatch.is_enabled("2022-10"));
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Sets the prefix of environment variable overrides.
    ///
    /// With prefix `ALPINEBITS`:
    /// - `ALPINEBITS__DISPATCH__ENABLED_VERSIONS=2022-10,2024-10`
    /// - `ALPINEBITS__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads `.env` from the working directory, if present.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads a specific `.env` file.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Applies environment overrides and validates the result.
    pub fn load(mut self) -> Result<AlpineBitsConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix, env::vars())?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or
    /// validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AlpineBitsConfig {
        self.config
    }

    fn apply_env_overrides<I>(&mut self, prefix: &str, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let scoped = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(path) = key.strip_prefix(&scoped) {
                self.apply_env_var(&key, path, &value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVICE_NAME"] => config.service_name = value.to_string(),

            ["DISPATCH", "ENABLED_VERSIONS"] => {
                config.dispatch.enabled_versions = split_list(value).map(Version::new).collect();
            }
            ["DISPATCH", "CAPTURE_ERRORS"] => {
                config.dispatch.capture_errors = parse_bool(key, value)?;
            }
            ["DISPATCH", "EXPOSE_INTERNAL_ERRORS"] => {
                config.dispatch.expose_internal_errors = parse_bool(key, value)?;
            }

            ["LOGGING", "ENABLED"] => config.logging.enabled = parse_bool(key, value)?,
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = parse_bool(key, value)?;
            }

            ["METRICS", "ENABLED"] => config.metrics.enabled = parse_bool(key, value)?,
            ["METRICS", "DURATION_BUCKETS"] => {
                config.metrics.duration_buckets = split_list(value)
                    .map(|b| {
                        b.parse::<f64>()
                            .map_err(|_| ConfigError::env(key, "expected list of floats"))
                    })
                    .collect::<Result<_, _>>()?;
            }

            // Unknown keys are ignored
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<AlpineBitsConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::Format(other.to_string())),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env(key, "expected boolean")),
    }
}
