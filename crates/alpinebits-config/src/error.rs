//! Loading and validation failures.

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("no configuration at {}", path.display())]
    Missing {
        /// Looked-up path.
        path: PathBuf,
    },

    /// The file exists but reading it failed.
    #[error("cannot read {}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        #[source]
        /// I/O failure.
        source: std::io::Error,
    },

    /// Neither TOML nor JSON.
    #[error("format {0:?} is not supported, use toml or json")]
    Format(String),

    /// Malformed TOML or an unknown key.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON or an unknown key.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A `.env` file exists but does not parse.
    #[error("dotenv: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A value parsed but is not acceptable.
    #[error("{field}: {reason}")]
    Invalid {
        /// Dotted path of the setting, e.g. `metrics.duration_buckets`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable holds an unparsable value.
    #[error("{var}: {reason}")]
    Env {
        /// Variable name including the prefix.
        var: String,
        /// Expected shape of the value.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
