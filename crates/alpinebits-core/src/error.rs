//! Error types for the AlpineBits dispatch engine.
//!
//! This module provides [`AlpineBitsError`], the single error type that
//! flows out of routing, chain execution and the built-in steps, and
//! [`ErrorCategory`], which the transport layer uses to map an error to a
//! wire-level response.
//!
//! | `ErrorCategory` | Raised by | Transport mapping |
//! |---|---|---|
//! | `Routing` | router lookup, disabled versions | unsupported action, 400 |
//! | `MissingPrerequisite` | `Context::get_or_err` | internal failure, 500 |
//! | `ChainContract` | panicking step | internal failure, 500 |
//! | `Build` | `RouterBuilder::build` | fatal at startup |
//! | `Validation` | document validators | bad request, 400 |
//! | `Conversion` | handshake data parsing | bad request, 400 |
//! | `Internal` | collaborators | internal failure, 500 |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`AlpineBitsError`].
pub type AlpineBitsResult<T> = Result<T, AlpineBitsError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// No chain registered for the requested version/action.
    Routing,
    /// A step read a context key that no earlier step produced.
    MissingPrerequisite,
    /// A step broke the chain contract.
    ChainContract,
    /// The router could not be built.
    Build,
    /// Document validation failed.
    Validation,
    /// Request data could not be converted.
    Conversion,
    /// Internal or collaborator failure.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> u16 {
        match self {
            Self::Routing | Self::Validation | Self::Conversion => 400,
            Self::MissingPrerequisite | Self::ChainContract | Self::Build | Self::Internal => 500,
        }
    }

    /// Returns true if the error was caused by the caller's request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Routing | Self::Validation | Self::Conversion)
    }

    /// Returns the category name used in logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Routing => "routing",
            Self::MissingPrerequisite => "missing_prerequisite",
            Self::ChainContract => "chain_contract",
            Self::Build => "build",
            Self::Validation => "validation",
            Self::Conversion => "conversion",
            Self::Internal => "internal",
        }
    }
}

/// Standard error type for AlpineBits.
///
/// # Example
///
/// ```
/// use alpinebits_core::{AlpineBitsError, ErrorCategory};
///
/// let err = AlpineBitsError::no_route("2024-10", "OTA_Read:GuestRequests");
/// assert_eq!(err.category(), ErrorCategory::Routing);
/// assert!(err.to_string().contains("OTA_Read:GuestRequests"));
/// ```
#[derive(Error, Debug)]
pub enum AlpineBitsError {
    /// No chain is registered for the version/action pair.
    #[error("no route for version {version} and action {action}")]
    NoRoute {
        /// Requested protocol version.
        version: String,
        /// Requested action.
        action: String,
    },

    /// The requested version is disabled for this deployment.
    #[error("unsupported version: {version}")]
    UnsupportedVersion {
        /// Requested protocol version.
        version: String,
    },

    /// A required context key is missing.
    #[error("required context key missing: {key}")]
    MissingContextKey {
        /// Name of the missing key.
        key: &'static str,
    },

    /// A step violated the chain contract.
    #[error("chain contract violated: {message}")]
    ChainContract {
        /// Description of the violation.
        message: String,
    },

    /// Two registrations share the same version/action pair.
    #[error("duplicate route for version {version} and action {action}")]
    DuplicateRoute {
        /// Conflicting protocol version.
        version: String,
        /// Conflicting action.
        action: String,
    },

    /// A registration has a chain without steps.
    #[error("empty chain registered for version {version} and action {action}")]
    EmptyChain {
        /// Protocol version of the registration.
        version: String,
        /// Action of the registration.
        action: String,
    },

    /// Document validation failed.
    #[error("validation failed at {path}: {message}")]
    Validation {
        /// Location of the failure within the document.
        path: String,
        /// Human-readable error message.
        message: String,
    },

    /// Handshake data could not be converted from or to JSON.
    #[error("handshake data conversion failed: {message}")]
    HandshakeDataConversion {
        /// Human-readable error message.
        message: String,
        /// The underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl AlpineBitsError {
    /// Creates a routing error for a version/action pair.
    #[must_use]
    pub fn no_route(version: impl Into<String>, action: impl Into<String>) -> Self {
        Self::NoRoute {
            version: version.into(),
            action: action.into(),
        }
    }

    /// Creates an unsupported version error.
    #[must_use]
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    /// Creates a missing context key error.
    #[must_use]
    pub const fn missing_context_key(key: &'static str) -> Self {
        Self::MissingContextKey { key }
    }

    /// Creates a chain contract violation.
    #[must_use]
    pub fn chain_contract(message: impl Into<String>) -> Self {
        Self::ChainContract {
            message: message.into(),
        }
    }

    /// Creates a duplicate route error.
    #[must_use]
    pub fn duplicate_route(version: impl Into<String>, action: impl Into<String>) -> Self {
        Self::DuplicateRoute {
            version: version.into(),
            action: action.into(),
        }
    }

    /// Creates an empty chain error.
    #[must_use]
    pub fn empty_chain(version: impl Into<String>, action: impl Into<String>) -> Self {
        Self::EmptyChain {
            version: version.into(),
            action: action.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a handshake data conversion error from a JSON error.
    #[must_use]
    pub fn handshake_conversion(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::HandshakeDataConversion {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates an internal error with a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a collaborator's error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::NoRoute { .. } | Self::UnsupportedVersion { .. } => ErrorCategory::Routing,
            Self::MissingContextKey { .. } => ErrorCategory::MissingPrerequisite,
            Self::ChainContract { .. } => ErrorCategory::ChainContract,
            Self::DuplicateRoute { .. } | Self::EmptyChain { .. } => ErrorCategory::Build,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::HandshakeDataConversion { .. } => ErrorCategory::Conversion,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code the transport should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.category().default_status_code()
    }
}
