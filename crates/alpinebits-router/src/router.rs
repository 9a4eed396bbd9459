//! The immutable routing table.

use crate::action::{Action, ActionKey};
use crate::builder::RouterBuilder;
use crate::capability::{Capability, CapabilitySet};
use alpinebits_core::{AlpineBitsError, AlpineBitsResult, Version};
use alpinebits_middleware::Chain;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

static EMPTY: CapabilitySet = CapabilitySet::new();

/// Everything registered for one protocol version.
#[derive(Debug, Default)]
pub(crate) struct VersionTable {
    /// Request parameter → chain.
    pub(crate) routes: HashMap<String, Arc<Chain>>,
    /// Actions in registration order.
    pub(crate) actions: Vec<Action>,
    pub(crate) capabilities: CapabilitySet,
    pub(crate) implicit: CapabilitySet,
}

/// Maps (version, action) pairs to chains and answers capability queries.
///
/// A router is produced once by a [`RouterBuilder`] and is read-only
/// afterwards. Lookups take no locks, so one `Arc<Router>` can serve any
/// number of concurrent requests.
///
/// # Example
///
/// ```rust
/// use alpinebits_core::Version;
/// use alpinebits_middleware::{from_fn, Chain};
/// use alpinebits_router::{Action, Router};
///
/// let router = Router::builder()
///     .version(Version::V_2022_10)
///     .supports_action(Action::HANDSHAKING)
///     .without_capabilities()
///     .using(Chain::single(from_fn("ping", |_ctx, _next| Box::pin(async { Ok(()) }))))
///     .build()
///     .unwrap();
///
/// assert!(router.resolve("2022-10", "OTA_Ping:Handshaking").is_ok());
/// assert!(router.resolve("2022-10", "OTA_Read:GuestRequests").is_err());
/// ```
pub struct Router {
    /// Versions in order of first registration.
    versions: Vec<Version>,
    tables: HashMap<Version, VersionTable>,
}

impl Router {
    /// Creates a new router builder.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_parts(versions: Vec<Version>, tables: HashMap<Version, VersionTable>) -> Self {
        Self { versions, tables }
    }

    /// Returns the chain registered for a version and action.
    ///
    /// # Errors
    ///
    /// Returns [`AlpineBitsError::NoRoute`] if nothing is registered for the
    /// exact pair.
    pub fn resolve(&self, version: &str, action: &str) -> AlpineBitsResult<&Arc<Chain>> {
        self.tables
            .get(version)
            .and_then(|table| table.routes.get(action))
            .ok_or_else(|| AlpineBitsError::no_route(version, action))
    }

    /// Returns the chain registered for a routing key.
    ///
    /// # Errors
    ///
    /// Returns [`AlpineBitsError::NoRoute`] if the key is not registered.
    pub fn resolve_key(&self, key: &ActionKey) -> AlpineBitsResult<&Arc<Chain>> {
        self.resolve(key.version().as_str(), key.action())
    }

    /// Returns true if a chain is registered for the pair.
    #[must_use]
    pub fn contains(&self, version: &str, action: &str) -> bool {
        self.resolve(version, action).is_ok()
    }

    /// Returns every capability registered for a version.
    ///
    /// Empty for versions without registrations.
    #[must_use]
    pub fn capabilities_for(&self, version: &str) -> &CapabilitySet {
        self.tables
            .get(version)
            .map_or(&EMPTY, |table| &table.capabilities)
    }

    /// Returns the capabilities a version supports implicitly.
    ///
    /// These are never advertised during a handshake, even when an action
    /// carrying them is registered. Empty for versions without
    /// registrations.
    #[must_use]
    pub fn implicit_capabilities_for(&self, version: &str) -> &CapabilitySet {
        self.tables.get(version).map_or(&EMPTY, |table| &table.implicit)
    }

    /// Returns the capabilities a version advertises during a handshake.
    ///
    /// This is [`capabilities_for`](Self::capabilities_for) without
    /// [`implicit_capabilities_for`](Self::implicit_capabilities_for). An
    /// implicit action capability also hides every sub-capability of that
    /// action.
    #[must_use]
    pub fn advertised_capabilities_for(&self, version: &str) -> CapabilitySet {
        let implicit = self.implicit_capabilities_for(version);
        let hidden_actions: BTreeSet<&str> = implicit
            .iter()
            .filter(|cap| cap.is_action())
            .map(Capability::action)
            .collect();

        self.capabilities_for(version)
            .iter()
            .filter(|cap| !implicit.contains(cap) && !hidden_actions.contains(cap.action()))
            .cloned()
            .collect()
    }

    /// Returns the registered versions in order of first registration.
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Returns the actions registered for a version, in registration order.
    #[must_use]
    pub fn actions_for(&self, version: &str) -> &[Action] {
        self.tables
            .get(version)
            .map_or(&[][..], |table| table.actions.as_slice())
    }

    /// Returns every routing key, grouped by version.
    pub fn keys(&self) -> impl Iterator<Item = ActionKey> + '_ {
        self.versions.iter().flat_map(move |version| {
            self.actions_for(version.as_str())
                .iter()
                .map(move |action| ActionKey::new(version.clone(), action.request_param()))
        })
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(|table| table.routes.len()).sum()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self.keys().map(|key| key.to_string()).collect();
        f.debug_struct("Router")
            .field("versions", &self.versions)
            .field("routes", &routes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::names;
    use alpinebits_core::{Context, ContextKey};
    use alpinebits_middleware::from_fn;

    const HIT: ContextKey<&'static str> = ContextKey::new("hit");

    fn marker_chain(marker: &'static str) -> Chain {
        Chain::single(from_fn(marker, move |ctx, _next| {
            Box::pin(async move {
                ctx.put(&HIT, marker);
                Ok(())
            })
        }))
    }

    fn sample_router() -> Router {
        Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(marker_chain("ping-2022"))
            .supports_action(Action::FREE_ROOMS_HOTEL_INV_COUNT_NOTIF)
            .with_capabilities([names::FREE_ROOMS_ACCEPT_ROOMS, names::FREE_ROOMS_ACCEPT_DELTAS])
            .using(marker_chain("freerooms-2022"))
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(marker_chain("ping-2024"))
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(marker_chain("read-2024"))
            .build()
            .unwrap()
    }

    async fn run(router: &Router, version: &str, action: &str) -> &'static str {
        let mut ctx = Context::new();
        router.resolve(version, action).unwrap().execute(&mut ctx).await.unwrap();
        ctx.get(&HIT).copied().unwrap()
    }

    #[tokio::test]
    async fn test_resolve_returns_registered_chain() {
        let router = sample_router();

        assert_eq!(run(&router, "2022-10", "OTA_Ping:Handshaking").await, "ping-2022");
        assert_eq!(run(&router, "2024-10", "OTA_Ping:Handshaking").await, "ping-2024");
        assert_eq!(
            run(&router, "2022-10", "OTA_HotelInvCountNotif:FreeRooms").await,
            "freerooms-2022"
        );
        assert_eq!(run(&router, "2024-10", "OTA_Read:GuestRequests").await, "read-2024");
    }

    #[test]
    fn test_resolve_is_exact() {
        let router = sample_router();

        let err = router.resolve("2022-10", "OTA_Read:GuestRequests").unwrap_err();
        assert!(matches!(
            err,
            AlpineBitsError::NoRoute { ref version, ref action }
                if version == "2022-10" && action == "OTA_Read:GuestRequests"
        ));
        assert!(router.resolve("2020-10", "OTA_Ping:Handshaking").is_err());
        assert!(router.resolve("2024-10", "ota_ping:handshaking").is_err());
    }

    #[test]
    fn test_capabilities_accumulate_per_version() {
        let router = sample_router();
        let caps = router.capabilities_for("2022-10");

        assert!(caps.contains(&Capability::for_action("action_OTA_Ping")));
        assert!(caps.contains(&Capability::for_action("action_OTA_HotelInvCountNotif")));
        assert!(caps.contains(&Capability::new(
            "action_OTA_HotelInvCountNotif",
            names::FREE_ROOMS_ACCEPT_ROOMS
        )));
        assert_eq!(caps.len(), 4);
    }

    #[test]
    fn test_unknown_version_has_empty_sets() {
        let router = sample_router();
        assert!(router.capabilities_for("2018-10").is_empty());
        assert!(router.implicit_capabilities_for("2018-10").is_empty());
        assert!(router.advertised_capabilities_for("2018-10").is_empty());
        assert!(router.actions_for("2018-10").is_empty());
    }

    #[test]
    fn test_advertised_excludes_implicit() {
        let router = sample_router();
        let handshake = Capability::for_action("action_OTA_Ping");

        assert!(router.capabilities_for("2024-10").contains(&handshake));
        assert!(router.implicit_capabilities_for("2024-10").contains(&handshake));
        assert!(!router.advertised_capabilities_for("2024-10").contains(&handshake));

        assert!(router.implicit_capabilities_for("2022-10").is_empty());
        assert!(router.advertised_capabilities_for("2022-10").contains(&handshake));
    }

    #[test]
    fn test_implicit_action_hides_its_sub_capabilities() {
        let router = Router::builder()
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .with_capabilities(["ping_feature"])
            .using(marker_chain("ping-2024"))
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(marker_chain("read-2024"))
            .build()
            .unwrap();

        let registered = router.capabilities_for("2024-10");
        assert!(registered.contains(&Capability::new("action_OTA_Ping", "ping_feature")));

        let advertised = router.advertised_capabilities_for("2024-10");
        assert!(advertised.iter().all(|cap| cap.action() != "action_OTA_Ping"));
        assert!(advertised.contains(&Capability::for_action("action_OTA_Read")));
        assert_eq!(advertised.len(), 1);
    }

    #[test]
    fn test_introspection() {
        let router = sample_router();

        assert_eq!(router.versions(), &[Version::V_2022_10, Version::V_2024_10]);
        assert_eq!(
            router.actions_for("2022-10"),
            &[Action::HANDSHAKING, Action::FREE_ROOMS_HOTEL_INV_COUNT_NOTIF]
        );
        assert_eq!(router.len(), 4);
        assert!(!router.is_empty());
        assert!(router.contains("2024-10", "OTA_Read:GuestRequests"));

        let keys: Vec<ActionKey> = router.keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], ActionKey::new(Version::V_2022_10, "OTA_Ping:Handshaking"));
        assert!(router.resolve_key(&keys[3]).is_ok());
    }

    #[test]
    fn test_router_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
        assert_send_sync::<Arc<Router>>();
    }
}
