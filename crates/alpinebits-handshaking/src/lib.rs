//! Handshake negotiation for the AlpineBits dispatch engine.
//!
//! During a handshake the client sends the versions and capabilities it
//! supports as JSON inside the ping's echo data. The server answers with
//! the echo data unchanged plus, as a warning, the JSON of what both sides
//! have in common:
//!
//! ```text
//! declared (client)        advertised (router)          negotiated
//! ─────────────────        ───────────────────          ──────────
//! 2024-10: Ping, Read  ∩   2024-10: Read  (Ping is  =   2024-10: Read
//!                                   implicit)
//! ```
//!
//! - [`HandshakingMiddleware`] - The step bound to the handshake action
//! - [`negotiate`] - Pure capability intersection
//! - [`HandshakingData`] - The JSON payload

#![doc(html_root_url = "https://docs.rs/alpinebits-handshaking/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod data;
mod middleware;
mod negotiate;

pub use data::{HandshakingData, SupportedAction, SupportedVersion};
pub use middleware::{HandshakingContextKey, HandshakingMiddleware, PingRequest, PingResponse};
pub use negotiate::{negotiate, negotiate_with_router};
