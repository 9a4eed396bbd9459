//! Version/action router for the AlpineBits dispatch engine.
//!
//! This crate maps a (protocol version, action) pair to the [`Chain`] that
//! serves it and keeps, per version, the set of [`Capability`] values a
//! handshake may advertise.
//!
//! # Features
//!
//! - **Exact Lookup**: one hash lookup per version and per action, no locks
//! - **Staged Builder**: `version → supports_action → capabilities → using`
//! - **Build Validation**: duplicate routes and empty chains are rejected
//! - **Implicit Capabilities**: per-version table of capabilities that are
//!   supported but never advertised
//!
//! # Example
//!
//! ```rust
//! use alpinebits_core::Version;
//! use alpinebits_middleware::{from_fn, Chain};
//! use alpinebits_router::{capability::names, Action, Capability, Router};
//!
//! let noop = || Chain::single(from_fn("noop", |_ctx, _next| Box::pin(async { Ok(()) })));
//!
//! let router = Router::builder()
//!     .version(Version::V_2024_10)
//!     .supports_action(Action::HANDSHAKING)
//!     .without_capabilities()
//!     .using(noop())
//!     .supports_action(Action::FREE_ROOMS_HOTEL_INV_COUNT_NOTIF)
//!     .with_capabilities([names::FREE_ROOMS_ACCEPT_ROOMS])
//!     .using(noop())
//!     .build()
//!     .unwrap();
//!
//! let advertised = router.advertised_capabilities_for("2024-10");
//! assert!(advertised.contains(&Capability::for_action("action_OTA_HotelInvCountNotif")));
//! // The handshake itself is implicit in 2024-10.
//! assert!(!advertised.contains(&Capability::for_action("action_OTA_Ping")));
//! ```
//!
//! [`Chain`]: alpinebits_middleware::Chain

#![doc(html_root_url = "https://docs.rs/alpinebits-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod builder;
pub mod capability;
mod implicit;
mod keys;
mod router;

pub use action::{Action, ActionKey};
pub use builder::{ActionBuilder, CapabilitiesBuilder, RouterBuilder, VersionBuilder};
pub use capability::{Capability, CapabilitySet};
pub use implicit::implicit_capabilities;
pub use keys::RouterContextKey;
pub use router::Router;
