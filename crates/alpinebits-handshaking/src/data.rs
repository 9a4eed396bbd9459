//! Handshake payload types.
//!
//! The handshake carries its data as JSON inside the ping's echo data:
//!
//! ```json
//! {"versions":[{"version":"2024-10","actions":[
//!     {"action":"action_OTA_HotelInvCountNotif",
//!      "supports":["OTA_HotelInvCountNotif_accept_rooms"]}
//! ]}]}
//! ```
//!
//! Empty `versions`, `actions` and `supports` lists are omitted when
//! serializing, so "nothing in common" is written as `{}`.

use alpinebits_core::{AlpineBitsError, AlpineBitsResult};
use alpinebits_router::{Capability, CapabilitySet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Versions and capabilities declared by one side of a handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakingData {
    /// Declared versions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<SupportedVersion>,
}

impl HandshakingData {
    /// Creates handshake data from a list of versions.
    #[must_use]
    pub fn new(versions: Vec<SupportedVersion>) -> Self {
        Self { versions }
    }

    /// Parses handshake data from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`AlpineBitsError::HandshakeDataConversion`] if the text is
    /// not valid handshake JSON.
    pub fn from_json(json: &str) -> AlpineBitsResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AlpineBitsError::handshake_conversion("invalid handshake data", e))
    }

    /// Serializes handshake data to its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`AlpineBitsError::HandshakeDataConversion`] if serialization
    /// fails.
    pub fn to_json(&self) -> AlpineBitsResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AlpineBitsError::handshake_conversion("cannot serialize handshake data", e))
    }

    /// Returns the entry for a version, if declared.
    #[must_use]
    pub fn version(&self, version: &str) -> Option<&SupportedVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    /// Returns true if no version is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// One declared version and its actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedVersion {
    /// Version string, e.g. `2024-10`.
    pub version: String,
    /// Declared actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<SupportedAction>,
}

impl SupportedVersion {
    /// Creates a version entry.
    #[must_use]
    pub fn new(version: impl Into<String>, actions: Vec<SupportedAction>) -> Self {
        Self {
            version: version.into(),
            actions,
        }
    }

    /// Builds a version entry from a capability set.
    ///
    /// Capabilities are grouped by action; actions and their supports come
    /// out sorted.
    #[must_use]
    pub fn from_capabilities(version: impl Into<String>, capabilities: &CapabilitySet) -> Self {
        let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for capability in capabilities {
            let supports = grouped.entry(capability.action()).or_default();
            if !capability.is_action() {
                supports.push(capability.supports().to_string());
            }
        }

        let actions = grouped
            .into_iter()
            .map(|(action, supports)| SupportedAction {
                action: action.to_string(),
                supports,
            })
            .collect();

        Self::new(version, actions)
    }

    /// Expands the entry into capabilities.
    ///
    /// Every action contributes its own capability plus one per supported
    /// feature.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        self.actions
            .iter()
            .flat_map(SupportedAction::capabilities)
            .collect()
    }
}

/// One declared action and its optional features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedAction {
    /// Capability name of the action, e.g. `action_OTA_Read`.
    pub action: String,
    /// Optional features of the action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<String>,
}

impl SupportedAction {
    /// Creates an action entry without features.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            supports: Vec::new(),
        }
    }

    /// Adds optional features.
    #[must_use]
    pub fn with_supports<I, S>(mut self, supports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supports.extend(supports.into_iter().map(Into::into));
        self
    }

    /// Expands the entry into capabilities.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        std::iter::once(Capability::for_action(self.action.as_str())).chain(
            self.supports
                .iter()
                .map(|supports| Capability::new(self.action.as_str(), supports.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::ErrorCategory;

    #[test]
    fn test_parse_full_document() {
        let json = r#"{"versions":[{"version":"2024-10","actions":[
            {"action":"action_OTA_Read"},
            {"action":"action_OTA_HotelInvCountNotif","supports":["OTA_HotelInvCountNotif_accept_rooms"]}
        ]}]}"#;

        let data = HandshakingData::from_json(json).unwrap();
        let version = data.version("2024-10").unwrap();
        assert_eq!(version.actions.len(), 2);
        assert!(version.actions[0].supports.is_empty());
        assert_eq!(version.capabilities().len(), 3);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let data = HandshakingData::from_json(r#"{"versions":[{"version":"2022-10"}]}"#).unwrap();
        assert!(data.version("2022-10").unwrap().actions.is_empty());
        assert!(HandshakingData::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_conversion_error() {
        let err = HandshakingData::from_json("[invalid json").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Conversion);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_serializes_as_empty_object() {
        assert_eq!(HandshakingData::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_empty_supports_omitted() {
        let data = HandshakingData::new(vec![SupportedVersion::new(
            "2024-10",
            vec![SupportedAction::new("action_OTA_Read")],
        )]);
        assert_eq!(
            data.to_json().unwrap(),
            r#"{"versions":[{"version":"2024-10","actions":[{"action":"action_OTA_Read"}]}]}"#
        );
    }

    #[test]
    fn test_capability_conversion_groups_by_action() {
        let caps: CapabilitySet = [
            Capability::for_action("action_OTA_Read"),
            Capability::for_action("action_OTA_HotelInvCountNotif"),
            Capability::new("action_OTA_HotelInvCountNotif", "OTA_HotelInvCountNotif_accept_rooms"),
        ]
        .into_iter()
        .collect();

        let version = SupportedVersion::from_capabilities("2024-10", &caps);
        assert_eq!(
            version.actions,
            vec![
                SupportedAction::new("action_OTA_HotelInvCountNotif")
                    .with_supports(["OTA_HotelInvCountNotif_accept_rooms"]),
                SupportedAction::new("action_OTA_Read"),
            ]
        );
        assert_eq!(version.capabilities(), caps);
    }
}
