//! Capabilities a version supports without advertising them.
//!
//! From 2024-10 on, every implementation must answer the handshake, so the
//! handshake action is no longer part of a negotiated capability list.

use crate::capability::{Capability, CapabilitySet};
use alpinebits_core::Version;

/// Action capabilities that become implicit as of a version, keyed by the
/// first version they apply to.
const IMPLICIT_SINCE: &[(Version, &[&str])] = &[(Version::V_2024_10, &["action_OTA_Ping"])];

/// Returns the implicit capabilities of a version.
///
/// An entry applies to its own version and every later one, compared the
/// way [`Version`] orders (`YYYY-MM`). Earlier versions have none.
#[must_use]
pub fn implicit_capabilities(version: &Version) -> CapabilitySet {
    IMPLICIT_SINCE
        .iter()
        .filter(|(since, _)| version >= since)
        .flat_map(|(_, actions)| actions.iter())
        .map(|action| Capability::for_action(*action))
        .collect()
}
