//! AlpineBits protocol versions.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// An AlpineBits protocol version such as `2024-10`.
///
/// Versions are compared structurally; ordering follows the `YYYY-MM`
/// string, which is chronological. The published versions are available as
/// constants, but any string is accepted so that a router can serve a
/// version this crate does not know about.
///
/// # Example
///
/// ```
/// use alpinebits_core::Version;
///
/// let v = Version::new("2024-10");
/// assert_eq!(v, Version::V_2024_10);
/// assert!(Version::V_2022_10 < Version::V_2024_10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(Cow<'static, str>);

impl Version {
    /// AlpineBits 2017-10.
    pub const V_2017_10: Self = Self::from_static("2017-10");
    /// AlpineBits 2018-10.
    pub const V_2018_10: Self = Self::from_static("2018-10");
    /// AlpineBits 2020-10.
    pub const V_2020_10: Self = Self::from_static("2020-10");
    /// AlpineBits 2022-10.
    pub const V_2022_10: Self = Self::from_static("2022-10");
    /// AlpineBits 2024-10.
    pub const V_2024_10: Self = Self::from_static("2024-10");

    /// Creates a version from any string.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self(Cow::Owned(version.into()))
    }

    /// Creates a version from a static string without allocating.
    #[must_use]
    pub const fn from_static(version: &'static str) -> Self {
        Self(Cow::Borrowed(version))
    }

    /// Returns the version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns all published versions, oldest first.
    #[must_use]
    pub fn known() -> [Self; 5] {
        [
            Self::V_2017_10,
            Self::V_2018_10,
            Self::V_2020_10,
            Self::V_2022_10,
            Self::V_2024_10,
        ]
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for Version {
    fn from(version: String) -> Self {
        Self::new(version)
    }
}

impl Borrow<str> for Version {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
