//! Rules for AlpineBits 2022-10.

use crate::validator::Delegate;

/// Closing seasons are checked exactly as in 2020-10.
pub type ClosingSeasonsOverlapValidator = Delegate<super::v2020_10::ClosingSeasonsOverlapValidator>;

/// Creates the 2022-10 closing-season validator.
#[must_use]
pub const fn closing_seasons_overlap_validator() -> ClosingSeasonsOverlapValidator {
    Delegate::new(super::v2020_10::ClosingSeasonsOverlapValidator)
}
