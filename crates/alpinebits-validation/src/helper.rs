//! Reusable checks for writing validators.
//!
//! Each helper returns a [`ValidationError`] located at the given path, so
//! validators read as a sequence of `?`-chained expectations:
//!
//! ```
//! use alpinebits_validation::helper::{expect_non_empty, expect_present};
//! use alpinebits_validation::{ValidationPath, ValidationResult};
//!
//! fn check_hotel_code(code: Option<&str>, path: &ValidationPath) -> ValidationResult {
//!     let path = path.with_attribute("HotelCode");
//!     let code = expect_present(code, &path)?;
//!     expect_non_empty(code, &path)
//! }
//!
//! let root = ValidationPath::from_path("Inventories");
//! assert!(check_hotel_code(Some("H1"), &root).is_ok());
//! assert!(check_hotel_code(None, &root).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::path::ValidationPath;
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Message for a missing required value.
pub const MISSING: &str = "value is required but missing";

/// Message for a value that must be absent.
pub const UNEXPECTED: &str = "value must not be present";

/// Message for an empty value.
pub const EMPTY: &str = "value must not be empty";

/// Requires a value to be present and returns it.
pub fn expect_present<T>(value: Option<T>, path: &ValidationPath) -> ValidationResult<T> {
    value.ok_or_else(|| ValidationError::new(path, MISSING))
}

/// Requires a value to be absent.
pub fn expect_absent<T>(value: Option<T>, path: &ValidationPath) -> ValidationResult {
    match value {
        Some(_) => Err(ValidationError::new(path, UNEXPECTED)),
        None => Ok(()),
    }
}

/// Requires a string to contain something other than whitespace.
pub fn expect_non_empty(value: &str, path: &ValidationPath) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(path, EMPTY));
    }
    Ok(())
}

/// Requires a list to have at least one item.
pub fn expect_non_empty_list<T>(items: &[T], path: &ValidationPath) -> ValidationResult {
    if items.is_empty() {
        return Err(ValidationError::new(path, EMPTY));
    }
    Ok(())
}

/// Requires a value to lie inside an inclusive range.
pub fn expect_in_range<T>(value: T, range: RangeInclusive<T>, path: &ValidationPath) -> ValidationResult
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new(
        path,
        format!(
            "value {value} is outside the range {}..={}",
            range.start(),
            range.end()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> ValidationPath {
        ValidationPath::from_path("Inventory").with_attribute("InvCode")
    }

    #[test]
    fn test_expect_present() {
        assert_eq!(expect_present(Some(3), &path()), Ok(3));

        let err = expect_present::<u8>(None, &path()).unwrap_err();
        assert_eq!(err.message, MISSING);
        assert_eq!(err.path.as_str(), "Inventory{InvCode}");
    }

    #[test]
    fn test_expect_absent() {
        assert!(expect_absent::<u8>(None, &path()).is_ok());
        assert_eq!(
            expect_absent(Some("x"), &path()).unwrap_err().message,
            UNEXPECTED
        );
    }

    #[test]
    fn test_expect_non_empty() {
        assert!(expect_non_empty("DZ", &path()).is_ok());
        assert!(expect_non_empty("", &path()).is_err());
        assert!(expect_non_empty(" \t", &path()).is_err());

        assert!(expect_non_empty_list(&[1], &path()).is_ok());
        assert!(expect_non_empty_list::<u8>(&[], &path()).is_err());
    }

    #[test]
    fn test_expect_in_range() {
        assert!(expect_in_range(1, 1..=9, &path()).is_ok());
        assert!(expect_in_range(9, 1..=9, &path()).is_ok());

        let err = expect_in_range(0, 1..=9, &path()).unwrap_err();
        assert_eq!(err.message, "value 0 is outside the range 1..=9");
    }
}
