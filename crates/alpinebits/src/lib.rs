//! # AlpineBits
//!
//! **Versioned, capability-negotiated dispatch for the AlpineBits protocol**
//!
//! A request names a protocol version and an action. The engine resolves
//! the pair to an ordered chain of steps, runs the chain over a per-request
//! context, and lets peers discover through the handshake which
//! (version, action, capability) combinations both sides understand.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use alpinebits::prelude::*;
//! use std::sync::Arc;
//!
//! let router = Router::builder()
//!     .version(Version::V_2024_10)
//!     .supports_action(Action::HANDSHAKING)
//!     .without_capabilities()
//!     .using(Chain::single(HandshakingMiddleware::new()))
//!     .build()?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(router));
//!
//! let mut ctx = Context::new();
//! ctx.put(&HandshakingContextKey::PING_REQUEST, PingRequest::new(echo_data));
//! dispatcher.dispatch("2024-10", "OTA_Ping:Handshaking", &mut ctx).await?;
//!
//! let response = ctx.get_or_err(&HandshakingContextKey::PING_RESPONSE)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! transport ─(version, action, Context)→ Dispatcher
//!                                            │ seed REQUEST_VERSION, REQUEST_ACTION, ROUTER
//!                                            ↓
//!                                  Router::resolve(version, action)
//!                                            ↓
//!                              Chain: step 1 → step 2 → … → step n
//! ```

#![doc(html_root_url = "https://docs.rs/alpinebits/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;

pub use dispatcher::Dispatcher;

// Re-export core types
pub use alpinebits_core as core;

// Re-export middleware types
pub use alpinebits_middleware as middleware;

// Re-export router types
pub use alpinebits_router as router;

// Re-export handshake types
pub use alpinebits_handshaking as handshaking;

// Re-export validation types
pub use alpinebits_validation as validation;

// Re-export telemetry
pub use alpinebits_telemetry as telemetry;

// Re-export configuration
pub use alpinebits_config as config;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use alpinebits::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Dispatcher;

    pub use alpinebits_core::{
        AlpineBitsError, AlpineBitsResult, Context, ContextKey, ErrorCategory, RequestContextKey,
        RequestId, Version,
    };

    pub use alpinebits_middleware::{
        from_fn, BoxFuture, CapturedError, Chain, ErrorCaptureMiddleware, Middleware, Next,
        CAPTURED_ERROR,
    };

    pub use alpinebits_router::{Action, Capability, Router, RouterContextKey};

    pub use alpinebits_handshaking::{
        HandshakingContextKey, HandshakingData, HandshakingMiddleware, PingRequest, PingResponse,
    };

    pub use alpinebits_validation::{
        Delegate, ValidationError, ValidationMiddleware, ValidationPath, Validator,
    };

    pub use alpinebits_config::{AlpineBitsConfig, ConfigLoader, DispatchConfig};
}
