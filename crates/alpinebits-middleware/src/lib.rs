//! # AlpineBits Middleware
//!
//! Middleware chain implementation for the AlpineBits dispatch engine.
//!
//! Every routed action is served by a [`Chain`]: an ordered, immutable
//! sequence of [`Middleware`] steps sharing one per-request
//! [`Context`](alpinebits_core::Context).
//!
//! ```text
//! execute(ctx) → step 1 ─next→ step 2 ─next→ step 3 ─next→ (end)
//!                   │             │             │
//!                   └── Err ──────┴─────────────┴──→ propagated to caller
//! ```
//!
//! ## Chain Contract
//!
//! - Steps run strictly in registration order
//! - A step continues the chain by calling [`Next::run`] once; `Next` is
//!   consumed by the call, so a second call does not compile
//! - A step that does not call `next` short-circuits the chain
//! - A step error aborts the chain and propagates unchanged
//! - A step panic aborts the chain as a chain contract violation
//!
//! ## Example
//!
//! ```
//! use alpinebits_core::{AlpineBitsResult, Context, ContextKey};
//! use alpinebits_middleware::{from_fn, BoxFuture, Chain, Next};
//!
//! const GREETING: ContextKey<String> = ContextKey::new("greeting");
//!
//! let chain = Chain::builder()
//!     .step(from_fn("greet", |ctx, next| {
//!         Box::pin(async move {
//!             ctx.put(&GREETING, "hello".to_string());
//!             next.run(ctx).await
//!         })
//!     }))
//!     .build();
//!
//! assert_eq!(chain.step_names(), vec!["greet"]);
//! ```

#![doc(html_root_url = "https://docs.rs/alpinebits-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;
pub mod stages;

// Re-export main types at crate root
pub use chain::{BoxedMiddleware, Chain, ChainBuilder};
pub use middleware::{from_fn, BoxFuture, FnMiddleware, Middleware, Next};
pub use stages::{CapturedError, ErrorCaptureMiddleware, CAPTURED_ERROR};
