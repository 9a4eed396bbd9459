//! Handshake step.

use crate::data::HandshakingData;
use crate::negotiate::negotiate_with_router;
use alpinebits_core::{AlpineBitsResult, Context, ContextKey};
use alpinebits_middleware::{BoxFuture, Middleware, Next};
use alpinebits_router::RouterContextKey;
use alpinebits_telemetry::metrics::record_handshake;
use std::sync::Arc;

/// The ping request, as extracted by the document reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    /// Echo data: the caller's handshake declaration as JSON.
    pub echo_data: String,
}

impl PingRequest {
    /// Creates a ping request.
    #[must_use]
    pub fn new(echo_data: impl Into<String>) -> Self {
        Self {
            echo_data: echo_data.into(),
        }
    }
}

/// The ping response, for the document writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResponse {
    /// The request's echo data, unmodified.
    pub echo_data: String,
    /// Capabilities both sides support.
    pub negotiated: HandshakingData,
    /// JSON form of `negotiated`; `{}` when nothing matched.
    pub warning: String,
}

impl PingResponse {
    /// Returns true if at least one capability matched.
    #[must_use]
    pub fn has_match(&self) -> bool {
        !self.negotiated.is_empty()
    }
}

/// Context keys used by the handshake.
#[derive(Debug, Clone, Copy)]
pub struct HandshakingContextKey;

impl HandshakingContextKey {
    /// Input: the ping request.
    pub const PING_REQUEST: ContextKey<PingRequest> = ContextKey::new("alpinebits.handshaking.request");

    /// Output: the ping response.
    pub const PING_RESPONSE: ContextKey<PingResponse> =
        ContextKey::new("alpinebits.handshaking.response");
}

/// Step answering the handshake action.
///
/// Reads the router from [`RouterContextKey::ROUTER`] and the ping from
/// [`HandshakingContextKey::PING_REQUEST`], negotiates, and writes
/// [`HandshakingContextKey::PING_RESPONSE`]. The response is complete, so
/// the rest of the chain is not run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandshakingMiddleware;

impl HandshakingMiddleware {
    /// Creates the handshake step.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn respond(ctx: &mut Context) -> AlpineBitsResult<()> {
        let router = Arc::clone(ctx.get_or_err(&RouterContextKey::ROUTER)?);
        let request = ctx.get_or_err(&HandshakingContextKey::PING_REQUEST)?;

        let declared = match HandshakingData::from_json(&request.echo_data) {
            Ok(declared) => declared,
            Err(e) => {
                record_handshake("invalid");
                return Err(e);
            }
        };

        let negotiated = negotiate_with_router(&router, &declared);
        let warning = negotiated.to_json()?;
        let response = PingResponse {
            echo_data: request.echo_data.clone(),
            negotiated,
            warning,
        };

        let outcome = if response.has_match() { "match" } else { "no_match" };
        record_handshake(outcome);
        tracing::debug!(
            request_id = %ctx.request_id(),
            declared_versions = declared.versions.len(),
            negotiated_versions = response.negotiated.versions.len(),
            outcome,
            "Handshake negotiated"
        );

        ctx.put(&HandshakingContextKey::PING_RESPONSE, response);
        Ok(())
    }
}

impl Middleware for HandshakingMiddleware {
    fn name(&self) -> &'static str {
        "handshaking"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        _next: Next<'a>,
    ) -> BoxFuture<'a, AlpineBitsResult<()>> {
        Box::pin(async move { Self::respond(ctx) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::{AlpineBitsError, ErrorCategory, Version};
    use alpinebits_middleware::{from_fn, Chain};
    use alpinebits_router::{Action, Router};

    fn router() -> Arc<Router> {
        Arc::new(
            Router::builder()
                .version(Version::V_2022_10)
                .supports_action(Action::HANDSHAKING)
                .without_capabilities()
                .using(Chain::single(HandshakingMiddleware::new()))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_missing_router_is_missing_prerequisite() {
        let mut ctx = Context::new();
        ctx.put(&HandshakingContextKey::PING_REQUEST, PingRequest::new("{}"));

        let err = Chain::single(HandshakingMiddleware::new())
            .execute(&mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AlpineBitsError::MissingContextKey { key: "alpinebits.router" }
        ));
    }

    #[tokio::test]
    async fn test_missing_ping_request_names_key() {
        let mut ctx = Context::new();
        ctx.put(&RouterContextKey::ROUTER, router());

        let err = Chain::single(HandshakingMiddleware::new())
            .execute(&mut ctx)
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MissingPrerequisite);
        assert!(err.to_string().contains("alpinebits.handshaking.request"));
    }

    #[tokio::test]
    async fn test_does_not_continue_chain() {
        let chain = Chain::builder()
            .step(HandshakingMiddleware::new())
            .step(from_fn("after", |_ctx, _next| {
                Box::pin(async { Err(AlpineBitsError::internal("must not run")) })
            }))
            .build();

        let mut ctx = Context::new();
        ctx.put(&RouterContextKey::ROUTER, router());
        ctx.put(&HandshakingContextKey::PING_REQUEST, PingRequest::new("{}"));

        chain.execute(&mut ctx).await.unwrap();
        let response = ctx.get(&HandshakingContextKey::PING_RESPONSE).unwrap();
        assert_eq!(response.warning, "{}");
        assert_eq!(response.echo_data, "{}");
        assert!(!response.has_match());
    }
}
