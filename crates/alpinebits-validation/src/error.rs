//! Validation errors.

use crate::path::ValidationPath;
use alpinebits_core::AlpineBitsError;
use thiserror::Error;

/// Result type for validators.
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// A rule violation, located in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed at {path}: {message}")]
pub struct ValidationError {
    /// Where the violation was found.
    pub path: ValidationPath,
    /// What was wrong.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    #[must_use]
    pub fn new(path: &ValidationPath, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for AlpineBitsError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.path.to_string(), err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::ErrorCategory;

    #[test]
    fn test_converts_to_core_error() {
        let path = ValidationPath::from_path("Inventories").with_element("Inventory");
        let err: AlpineBitsError = ValidationError::new(&path, "element is missing").into();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.to_string(),
            "validation failed at Inventories->Inventory: element is missing"
        );
    }
}
