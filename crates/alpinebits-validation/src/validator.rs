//! The validator seam.

use crate::error::ValidationResult;
use crate::path::ValidationPath;

/// Checks a value of type `T` against a validation context of type `C`.
///
/// `C` carries whatever the rules need beyond the value itself, such as
/// the capabilities negotiated for the request. Validators for values that
/// need no context use `()`.
///
/// Closures with the matching signature are validators too.
///
/// # Example
///
/// ```
/// use alpinebits_validation::{ValidationError, ValidationPath, Validator};
///
/// let positive = |value: &i64, _ctx: &(), path: &ValidationPath| {
///     if *value > 0 {
///         Ok(())
///     } else {
///         Err(ValidationError::new(path, "must be positive"))
///     }
/// };
///
/// let path = ValidationPath::from_path("Count");
/// assert!(positive.validate(&3, &(), &path).is_ok());
/// assert!(positive.validate(&0, &(), &path).is_err());
/// ```
pub trait Validator<T: ?Sized, C: ?Sized = ()>: Send + Sync {
    /// Validates `value` located at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](crate::ValidationError) describing the
    /// first violation found.
    fn validate(&self, value: &T, ctx: &C, path: &ValidationPath) -> ValidationResult;
}

impl<T, C, F> Validator<T, C> for F
where
    T: ?Sized,
    C: ?Sized,
    F: Fn(&T, &C, &ValidationPath) -> ValidationResult + Send + Sync,
{
    fn validate(&self, value: &T, ctx: &C, path: &ValidationPath) -> ValidationResult {
        self(value, ctx, path)
    }
}

/// A validator that forwards to the implementation of an earlier version.
///
/// When a rule did not change between protocol versions, the newer version
/// wraps the older validator instead of repeating it.
///
/// ```
/// use alpinebits_validation::{Delegate, ValidationPath, ValidationResult, Validator};
///
/// let v2020 = |_value: &str, _ctx: &(), _path: &ValidationPath| -> ValidationResult { Ok(()) };
/// let v2024 = Delegate::new(v2020);
///
/// assert!(v2024.validate("HOTEL1", &(), &ValidationPath::from_path("HotelCode")).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Delegate<V> {
    inner: V,
}

impl<V> Delegate<V> {
    /// Wraps the earlier version's validator.
    #[must_use]
    pub const fn new(inner: V) -> Self {
        Self { inner }
    }

    /// Returns the wrapped validator.
    #[must_use]
    pub const fn inner(&self) -> &V {
        &self.inner
    }
}

impl<T, C, V> Validator<T, C> for Delegate<V>
where
    T: ?Sized,
    C: ?Sized,
    V: Validator<T, C>,
{
    fn validate(&self, value: &T, ctx: &C, path: &ValidationPath) -> ValidationResult {
        self.inner.validate(value, ctx, path)
    }
}

/// Validates every item of a list with the same validator.
///
/// Item `i` is validated at `path` + `element[i]`.
///
/// # Errors
///
/// Returns the first item's error.
pub fn validate_each<T, C, V>(
    items: &[T],
    validator: &V,
    ctx: &C,
    path: &ValidationPath,
    element: &str,
) -> ValidationResult
where
    C: ?Sized,
    V: Validator<T, C> + ?Sized,
{
    let element_path = path.with_element(element);
    items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| validator.validate(item, ctx, &element_path.with_index(i)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    struct NonEmptyCode;

    impl Validator<str> for NonEmptyCode {
        fn validate(&self, value: &str, _ctx: &(), path: &ValidationPath) -> ValidationResult {
            if value.trim().is_empty() {
                return Err(ValidationError::new(path, "must not be empty"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_delegate_forwards() {
        let delegate = Delegate::new(NonEmptyCode);
        let path = ValidationPath::from_path("HotelCode");

        assert!(delegate.validate("H1", &(), &path).is_ok());
        let err = delegate.validate("  ", &(), &path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_validate_each_reports_index() {
        let codes = vec!["A".to_string(), "B".to_string(), String::new()];
        let validator = |value: &String, _ctx: &(), path: &ValidationPath| {
            NonEmptyCode.validate(value.as_str(), &(), path)
        };

        let err = validate_each(
            &codes,
            &validator,
            &(),
            &ValidationPath::from_path("Inventories"),
            "Inventory",
        )
        .unwrap_err();

        assert_eq!(err.path.as_str(), "Inventories->Inventory[2]");
    }

    #[test]
    fn test_validate_each_empty_list_ok() {
        let items: Vec<u8> = Vec::new();
        let fail = |_: &u8, _: &(), path: &ValidationPath| -> ValidationResult {
            Err(ValidationError::new(path, "no"))
        };
        assert!(validate_each(&items, &fail, &(), &ValidationPath::from_path("X"), "Y").is_ok());
    }
}
