//! Built-in chain steps.
//!
//! Stages here are not tied to a protocol action and can be placed in any
//! chain.
//!
//! - [`error_capture`] - Converts failures of the rest of the chain into a
//!   [`CapturedError`] context entry

pub mod error_capture;

pub use error_capture::{CapturedError, ErrorCaptureMiddleware, CAPTURED_ERROR};
