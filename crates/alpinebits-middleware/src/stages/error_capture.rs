//! Error capture middleware.
//!
//! Wraps the rest of the chain and turns a failure into a [`CapturedError`]
//! context entry, so the transport can answer with a protocol-level error
//! document instead of aborting the request.
//!
//! # Behavior
//!
//! - On success the context is left untouched
//! - On failure the error is logged, classified and stored under
//!   [`CAPTURED_ERROR`]; the step itself then completes with `Ok(())`
//! - Internal errors (server-side categories) are masked unless
//!   [`ErrorCaptureMiddleware::expose_internal_errors`] is enabled

use crate::middleware::{BoxFuture, Middleware, Next};
use alpinebits_core::{AlpineBitsError, AlpineBitsResult, Context, ContextKey, ErrorCategory};
use serde::{Deserialize, Serialize};

/// Context key holding the captured failure.
pub const CAPTURED_ERROR: ContextKey<CapturedError> = ContextKey::new("alpinebits.captured_error");

/// A failure of the chain, converted into data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    /// Classification of the failure.
    pub category: ErrorCategory,
    /// Status code the transport should answer with.
    pub status_code: u16,
    /// Message safe to return to the caller.
    pub message: String,
}

impl CapturedError {
    /// Returns true if the failure was caused by the caller's request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.category.is_client_error()
    }
}

/// Step that captures errors raised by the steps after it.
#[derive(Debug, Clone)]
pub struct ErrorCaptureMiddleware {
    expose_internal_errors: bool,
    internal_error_message: String,
}

impl ErrorCaptureMiddleware {
    /// Creates a capture step that masks internal error details.
    #[must_use]
    pub fn new() -> Self {
        Self {
            expose_internal_errors: false,
            internal_error_message: "Internal error".to_string(),
        }
    }

    /// Controls whether internal error messages are passed to the caller.
    #[must_use]
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Sets the message used in place of masked internal errors.
    #[must_use]
    pub fn internal_error_message(mut self, message: impl Into<String>) -> Self {
        self.internal_error_message = message.into();
        self
    }

    fn capture(&self, error: &AlpineBitsError) -> CapturedError {
        let category = error.category();
        let message = if category.is_client_error() || self.expose_internal_errors {
            error.to_string()
        } else {
            self.internal_error_message.clone()
        };

        CapturedError {
            category,
            status_code: error.status_code(),
            message,
        }
    }

    /// Logs `error` and stores its client-facing form under
    /// [`CAPTURED_ERROR`].
    ///
    /// Used by callers that fail before a chain runs, such as routing.
    pub fn capture_into(&self, ctx: &mut Context, error: &AlpineBitsError) {
        let captured = self.capture(error);
        if captured.is_client_error() {
            tracing::warn!(
                request_id = %ctx.request_id(),
                category = captured.category.as_str(),
                error = %error,
                "Request rejected"
            );
        } else {
            tracing::error!(
                request_id = %ctx.request_id(),
                category = captured.category.as_str(),
                error = ?error,
                "Request failed"
            );
        }

        ctx.put(&CAPTURED_ERROR, captured);
    }
}

impl Default for ErrorCaptureMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for ErrorCaptureMiddleware {
    fn name(&self) -> &'static str {
        "error_capture"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, AlpineBitsResult<()>> {
        Box::pin(async move {
            if let Err(error) = next.run(ctx).await {
                self.capture_into(ctx, &error);
            }
            Ok(())
        })
    }
}
