//! Staged router construction.
//!
//! Registration walks through four small stages, each returned by the
//! previous one:
//!
//! ```text
//! RouterBuilder ─version()→ VersionBuilder ─supports_action()→ ActionBuilder
//!       ▲                        ▲    │                              │
//!       │                        │    └─build()→ Router    with_capabilities()
//!       └──version_complete()────┤                                   ▼
//!                                └────────────using()──────── CapabilitiesBuilder
//! ```
//!
//! An action cannot be registered without a chain and a chain cannot be
//! given without naming the action first; both mistakes fail to compile.
//! What the type system cannot rule out (duplicate keys, empty chains) is
//! checked by [`RouterBuilder::build`].

use crate::action::Action;
use crate::capability::{Capability, CapabilitySet};
use crate::implicit::implicit_capabilities;
use crate::router::{Router, VersionTable};
use alpinebits_core::{AlpineBitsError, AlpineBitsResult, Version};
use alpinebits_middleware::Chain;
use std::collections::HashMap;
use std::sync::Arc;

/// One action registration, not yet validated.
struct ActionRegistration {
    action: Action,
    capabilities: Vec<String>,
    chain: Arc<Chain>,
}

/// All registrations made inside one `version(..)` stage.
struct VersionRegistration {
    version: Version,
    implicit: CapabilitySet,
    actions: Vec<ActionRegistration>,
}

/// Accumulates registrations and produces a [`Router`].
///
/// The builder is meant to be used once, on a single thread, before any
/// request is served.
#[derive(Default)]
pub struct RouterBuilder {
    versions: Vec<VersionRegistration>,
}

impl RouterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts registering actions for a version.
    ///
    /// A version may be opened more than once; its registrations are merged.
    pub fn version(self, version: impl Into<Version>) -> VersionBuilder {
        VersionBuilder {
            parent: self,
            current: VersionRegistration {
                version: version.into(),
                implicit: CapabilitySet::new(),
                actions: Vec::new(),
            },
        }
    }

    /// Validates the registrations and builds the router.
    ///
    /// For every registration the action's own capability and each extra
    /// capability are added to its version's capability set. Implicit
    /// capabilities start from the built-in table and include everything
    /// added with [`VersionBuilder::implicit_capability`].
    ///
    /// # Errors
    ///
    /// - [`AlpineBitsError::DuplicateRoute`] if two registrations share a
    ///   version and request parameter
    /// - [`AlpineBitsError::EmptyChain`] if a registered chain has no steps
    ///
    /// A version opened without any action is left out of the router, so
    /// all of its capability queries answer with the empty set.
    pub fn build(self) -> AlpineBitsResult<Router> {
        let mut order: Vec<Version> = Vec::new();
        let mut tables: HashMap<Version, VersionTable> = HashMap::new();

        for registration in self.versions {
            let version = registration.version;
            let table = tables.entry(version.clone()).or_insert_with(|| {
                order.push(version.clone());
                VersionTable {
                    implicit: implicit_capabilities(&version),
                    ..VersionTable::default()
                }
            });
            table.implicit.extend(registration.implicit);

            for ActionRegistration {
                action,
                capabilities,
                chain,
            } in registration.actions
            {
                if chain.is_empty() {
                    return Err(AlpineBitsError::empty_chain(
                        version.as_str(),
                        action.request_param(),
                    ));
                }
                if table.routes.contains_key(action.request_param()) {
                    return Err(AlpineBitsError::duplicate_route(
                        version.as_str(),
                        action.request_param(),
                    ));
                }

                table
                    .capabilities
                    .insert(Capability::for_action(action.capability()));
                table.capabilities.extend(
                    capabilities
                        .into_iter()
                        .map(|supports| Capability::new(action.capability(), supports)),
                );

                tracing::debug!(
                    version = %version,
                    action = %action,
                    steps = ?chain.step_names(),
                    "Registered route"
                );
                table.routes.insert(action.request_param().to_string(), chain);
                table.actions.push(action);
            }
        }

        tables.retain(|_, table| !table.routes.is_empty());
        order.retain(|version| tables.contains_key(version));

        let router = Router::from_parts(order, tables);
        tracing::info!(
            versions = router.versions().len(),
            routes = router.len(),
            "Router built"
        );
        Ok(router)
    }
}

/// Registration stage for one version.
pub struct VersionBuilder {
    parent: RouterBuilder,
    current: VersionRegistration,
}

impl VersionBuilder {
    /// Declares an extra implicit capability for this version.
    pub fn implicit_capability(mut self, capability: Capability) -> Self {
        self.current.implicit.insert(capability);
        self
    }

    /// Starts registering an action.
    pub fn supports_action(self, action: Action) -> ActionBuilder {
        ActionBuilder {
            version: self,
            action,
        }
    }

    /// Finishes this version and returns to the router stage.
    pub fn version_complete(self) -> RouterBuilder {
        let mut parent = self.parent;
        parent.versions.push(self.current);
        parent
    }

    /// Finishes this version and starts the next one.
    pub fn version(self, version: impl Into<Version>) -> VersionBuilder {
        self.version_complete().version(version)
    }

    /// Finishes this version and builds the router.
    ///
    /// # Errors
    ///
    /// See [`RouterBuilder::build`].
    pub fn build(self) -> AlpineBitsResult<Router> {
        self.version_complete().build()
    }
}

/// Registration stage for one action: capabilities come next.
pub struct ActionBuilder {
    version: VersionBuilder,
    action: Action,
}

impl ActionBuilder {
    /// Declares the optional features of the action.
    pub fn with_capabilities<I, S>(self, capabilities: I) -> CapabilitiesBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CapabilitiesBuilder {
            version: self.version,
            action: self.action,
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }

    /// Declares that the action has no optional features.
    pub fn without_capabilities(self) -> CapabilitiesBuilder {
        self.with_capabilities(std::iter::empty::<String>())
    }
}

/// Registration stage for one action: the chain comes next.
pub struct CapabilitiesBuilder {
    version: VersionBuilder,
    action: Action,
    capabilities: Vec<String>,
}

impl CapabilitiesBuilder {
    /// Sets the chain serving the action and returns to the version stage.
    pub fn using(self, chain: impl Into<Arc<Chain>>) -> VersionBuilder {
        let mut version = self.version;
        version.current.actions.push(ActionRegistration {
            action: self.action,
            capabilities: self.capabilities,
            chain: chain.into(),
        });
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::ErrorCategory;
    use alpinebits_middleware::from_fn;

    fn noop() -> Chain {
        Chain::single(from_fn("noop", |_ctx, _next| Box::pin(async { Ok(()) })))
    }

    #[test]
    fn test_duplicate_route_fails_build() {
        let result = Router::builder()
            .version(Version::V_2024_10)
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(noop())
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(noop())
            .build();

        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Build);
        assert!(matches!(
            err,
            AlpineBitsError::DuplicateRoute { ref version, ref action }
                if version == "2024-10" && action == "OTA_Read:GuestRequests"
        ));
    }

    #[test]
    fn test_duplicate_across_reopened_version() {
        let result = Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .version_complete()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .build();

        assert!(matches!(result, Err(AlpineBitsError::DuplicateRoute { .. })));
    }

    #[test]
    fn test_same_action_in_two_versions_is_allowed() {
        let router = Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_empty_chain_fails_build() {
        let result = Router::builder()
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(Chain::builder().build())
            .build();

        assert!(matches!(
            result,
            Err(AlpineBitsError::EmptyChain { ref action, .. }) if action == "OTA_Ping:Handshaking"
        ));
    }

    #[test]
    fn test_reopened_version_merges() {
        let router = Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .version(Version::V_2022_10)
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.versions(), &[Version::V_2022_10, Version::V_2024_10]);
        assert_eq!(router.actions_for("2022-10").len(), 2);
        assert_eq!(router.capabilities_for("2022-10").len(), 2);
    }

    #[test]
    fn test_shared_capability_collapses() {
        let router = Router::builder()
            .version(Version::V_2024_10)
            .supports_action(Action::GUEST_REQUESTS_PULL)
            .without_capabilities()
            .using(noop())
            .supports_action(Action::GUEST_REQUESTS_ACKNOWLEDGE)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.len(), 2);
        assert_eq!(router.capabilities_for("2024-10").len(), 1);
    }

    #[test]
    fn test_custom_implicit_capability() {
        let router = Router::builder()
            .version(Version::V_2022_10)
            .implicit_capability(Capability::for_action("action_OTA_Ping"))
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.implicit_capabilities_for("2022-10").len(), 1);
        assert!(router.advertised_capabilities_for("2022-10").is_empty());
    }

    #[test]
    fn test_shared_chain_instance() {
        let chain = Arc::new(noop());
        let router = Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(Arc::clone(&chain))
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(Arc::clone(&chain))
            .build()
            .unwrap();

        let a = router.resolve("2022-10", "OTA_Ping:Handshaking").unwrap();
        let b = router.resolve("2024-10", "OTA_Ping:Handshaking").unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_version_without_actions_is_dropped() {
        let router = Router::builder()
            .version(Version::V_2024_10)
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.versions(), &[Version::V_2022_10]);
        assert!(router.capabilities_for("2024-10").is_empty());
        assert!(router.implicit_capabilities_for("2024-10").is_empty());
    }

    #[test]
    fn test_version_reopened_with_actions_keeps_earlier_implicits() {
        let router = Router::builder()
            .version(Version::V_2022_10)
            .implicit_capability(Capability::for_action("action_OTA_Ping"))
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(noop())
            .build()
            .unwrap();

        assert_eq!(router.implicit_capabilities_for("2022-10").len(), 1);
        assert!(router.advertised_capabilities_for("2022-10").is_empty());
    }

    #[test]
    fn test_empty_builder_builds_empty_router() {
        let router = RouterBuilder::new().build().unwrap();
        assert!(router.is_empty());
        assert!(router.versions().is_empty());
    }
}
