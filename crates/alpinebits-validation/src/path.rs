//! Locations inside a validated document.

use std::fmt;

/// Separates nested elements.
pub const DELIMITER: &str = "->";

/// Location of a value inside a document, used in error messages.
///
/// Paths are immutable; every `with_*` call returns a new path.
///
/// # Example
///
/// ```
/// use alpinebits_validation::ValidationPath;
///
/// let path = ValidationPath::from_path("Inventories")
///     .with_element("Inventory")
///     .with_index(2)
///     .with_element("StatusApplicationControl")
///     .with_attribute("Start");
///
/// assert_eq!(
///     path.to_string(),
///     "Inventories->Inventory[2]->StatusApplicationControl{Start}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationPath(String);

impl ValidationPath {
    /// Starts a path at a root element.
    #[must_use]
    pub fn from_path(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Descends into a child element.
    #[must_use]
    pub fn with_element(&self, element: &str) -> Self {
        Self(format!("{}{DELIMITER}{element}", self.0))
    }

    /// Points at an attribute of the current element.
    #[must_use]
    pub fn with_attribute(&self, attribute: &str) -> Self {
        Self(format!("{}{{{attribute}}}", self.0))
    }

    /// Points at one item of a repeated element.
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns the path as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
