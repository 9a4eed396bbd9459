//! Capability negotiation.

use crate::data::{HandshakingData, SupportedVersion};
use alpinebits_router::{CapabilitySet, Router};

/// Returns the capabilities both sides support.
///
/// Plain set intersection on structural equality: order is irrelevant and
/// duplicates collapse. An empty result is a valid answer.
#[must_use]
pub fn negotiate(local: &CapabilitySet, declared: &CapabilitySet) -> CapabilitySet {
    local.intersection(declared).cloned().collect()
}

/// Negotiates a caller's declaration against a router.
///
/// For every version the caller declares, the declared capabilities are
/// intersected with what the router advertises for that version
/// (registered minus implicit). Versions with nothing in common are left
/// out. Versions keep the caller's order; a version declared twice is
/// merged into its first occurrence.
#[must_use]
pub fn negotiate_with_router(router: &Router, declared: &HandshakingData) -> HandshakingData {
    let mut merged: Vec<(&str, CapabilitySet)> = Vec::new();
    for entry in &declared.versions {
        let capabilities = entry.capabilities();
        match merged.iter_mut().find(|(v, _)| *v == entry.version) {
            Some((_, existing)) => existing.extend(capabilities),
            None => merged.push((entry.version.as_str(), capabilities)),
        }
    }

    let versions = merged
        .into_iter()
        .filter_map(|(version, wanted)| {
            let common = negotiate(&router.advertised_capabilities_for(version), &wanted);
            tracing::debug!(
                version,
                declared = wanted.len(),
                common = common.len(),
                "Negotiated version"
            );
            (!common.is_empty()).then(|| SupportedVersion::from_capabilities(version, &common))
        })
        .collect();

    HandshakingData::new(versions)
}
