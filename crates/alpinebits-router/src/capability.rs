//! Capabilities advertised during a handshake.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An ordered set of capabilities.
///
/// Ordered so that anything derived from it (handshake answers, logs) is
/// deterministic.
pub type CapabilitySet = BTreeSet<Capability>;

/// Well-known sub-capability names.
pub mod names {
    /// Free rooms: room-level availability.
    pub const FREE_ROOMS_ACCEPT_ROOMS: &str = "OTA_HotelInvCountNotif_accept_rooms";
    /// Free rooms: category-level availability.
    pub const FREE_ROOMS_ACCEPT_CATEGORIES: &str = "OTA_HotelInvCountNotif_accept_categories";
    /// Free rooms: delta updates.
    pub const FREE_ROOMS_ACCEPT_DELTAS: &str = "OTA_HotelInvCountNotif_accept_deltas";
    /// Free rooms: out-of-order rooms.
    pub const FREE_ROOMS_ACCEPT_OUT_OF_ORDER: &str = "OTA_HotelInvCountNotif_accept_out_of_order";
    /// Free rooms: out-of-market rooms.
    pub const FREE_ROOMS_ACCEPT_OUT_OF_MARKET: &str = "OTA_HotelInvCountNotif_accept_out_of_market";
    /// Free rooms: closing seasons.
    pub const FREE_ROOMS_ACCEPT_CLOSING_SEASONS: &str =
        "OTA_HotelInvCountNotif_accept_closing_seasons";
    /// Inventory: hotel info in the basic push.
    pub const INVENTORY_USE_ROOMS: &str = "OTA_HotelDescriptiveContentNotif_Inventory_use_rooms";
    /// Inventory: occupancy children.
    pub const INVENTORY_OCCUPANCY_CHILDREN: &str =
        "OTA_HotelDescriptiveContentNotif_Inventory_occupancy_children";
    /// Rate plans: static rate plans.
    pub const RATE_PLANS_ACCEPT_STATIC_RATES: &str =
        "OTA_HotelRatePlanNotif_accept_RatePlan_static_rates";
}

/// A single advertised capability.
///
/// `supports == action` means the action itself is supported. Any other
/// value names an optional feature of that action, e.g.
/// `(action_OTA_HotelInvCountNotif, OTA_HotelInvCountNotif_accept_rooms)`.
///
/// # Example
///
/// ```rust
/// use alpinebits_router::Capability;
///
/// let cap = Capability::for_action("action_OTA_Ping");
/// assert!(cap.is_action());
/// assert_eq!(cap.supports(), "action_OTA_Ping");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    action: String,
    supports: String,
}

impl Capability {
    /// Creates a capability.
    #[must_use]
    pub fn new(action: impl Into<String>, supports: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            supports: supports.into(),
        }
    }

    /// Creates the capability stating that `action` itself is supported.
    #[must_use]
    pub fn for_action(action: impl Into<String>) -> Self {
        let action = action.into();
        Self {
            supports: action.clone(),
            action,
        }
    }

    /// Returns the action name.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the supported action or feature name.
    #[must_use]
    pub fn supports(&self) -> &str {
        &self.supports
    }

    /// Returns true if this capability states support for the action itself.
    #[must_use]
    pub fn is_action(&self) -> bool {
        self.action == self.supports
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_action() {
            f.write_str(&self.action)
        } else {
            write!(f, "{}/{}", self.action, self.supports)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality_collapses_duplicates() {
        let mut set = CapabilitySet::new();
        set.insert(Capability::new("action_OTA_Read", "action_OTA_Read"));
        set.insert(Capability::for_action("action_OTA_Read"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sub_capability() {
        let cap = Capability::new("action_OTA_HotelInvCountNotif", names::FREE_ROOMS_ACCEPT_ROOMS);
        assert!(!cap.is_action());
        assert_eq!(
            cap.to_string(),
            "action_OTA_HotelInvCountNotif/OTA_HotelInvCountNotif_accept_rooms"
        );
    }

    #[test]
    fn test_set_order_is_deterministic() {
        let set: CapabilitySet = [
            Capability::for_action("b"),
            Capability::for_action("a"),
            Capability::new("a", "z"),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, vec!["a", "a/z", "b"]);
    }
}
