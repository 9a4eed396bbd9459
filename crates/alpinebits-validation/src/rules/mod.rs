//! Built-in validation rules, grouped by the protocol version that
//! introduced them.
//!
//! A version whose rule did not change wraps the earlier one in a
//! [`Delegate`](crate::Delegate).

pub mod v2020_10;
pub mod v2022_10;

/// A closing season of a FreeRooms document.
///
/// Dates are ISO-8601 calendar dates (`YYYY-MM-DD`), inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingSeason {
    /// First closed day.
    pub start: String,
    /// Last closed day.
    pub end: String,
}

impl ClosingSeason {
    /// Creates a closing season.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}
