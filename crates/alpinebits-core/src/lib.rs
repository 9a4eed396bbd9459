//! # AlpineBits Core
//!
//! Core types shared by every crate of the AlpineBits dispatch engine.
//!
//! - [`Context`] - Per-request typed key/value store threaded through a chain
//! - [`ContextKey`] - Typed key used to read and write [`Context`] entries
//! - [`RequestId`] - UUID v7 request identifier for log correlation
//! - [`Version`] - AlpineBits protocol version
//! - [`AlpineBitsError`] - Standard error type with [`ErrorCategory`] classification
//! - [`RequestContextKey`] - Keys populated by the inbound request collaborator

#![doc(html_root_url = "https://docs.rs/alpinebits-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod keys;
mod version;

pub use context::{Context, ContextKey, RequestId};
pub use error::{AlpineBitsError, AlpineBitsResult, ErrorCategory};
pub use keys::RequestContextKey;
pub use version::Version;
