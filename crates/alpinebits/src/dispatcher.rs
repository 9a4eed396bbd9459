//! The inbound entry point.

use alpinebits_config::DispatchConfig;
use alpinebits_core::{AlpineBitsError, AlpineBitsResult, Context, RequestContextKey, Version};
use alpinebits_middleware::ErrorCaptureMiddleware;
use alpinebits_router::{Router, RouterContextKey};
use alpinebits_telemetry::metrics::record_dispatch;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Runs requests against a router.
///
/// The transport hands over the requested version and action together with
/// a context holding the payload. The dispatcher seeds the request keys,
/// resolves the chain and runs it.
///
/// With `capture_errors` enabled, failures (routing included) are stored
/// under [`CAPTURED_ERROR`](alpinebits_middleware::CAPTURED_ERROR) and `dispatch` returns `Ok`.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new(Arc::new(router)).with_config(config.dispatch);
///
/// let mut ctx = Context::new();
/// ctx.put(&HandshakingContextKey::PING_REQUEST, PingRequest::new(echo_data));
/// dispatcher.dispatch("2024-10", "OTA_Ping:Handshaking", &mut ctx).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    config: DispatchConfig,
    capture: Option<ErrorCaptureMiddleware>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn new(router: Arc<Router>) -> Self {
        let config = DispatchConfig::default();
        Self {
            router,
            capture: capture_for(&config),
            config,
        }
    }

    /// Replaces the dispatch configuration.
    #[must_use]
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.capture = capture_for(&config);
        self.config = config;
        self
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Returns the dispatch configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatches one request.
    ///
    /// # Errors
    ///
    /// Without error capture, returns [`AlpineBitsError::UnsupportedVersion`]
    /// for disabled versions, [`AlpineBitsError::NoRoute`] for unknown
    /// actions, or the chain's error.
    pub async fn dispatch(
        &self,
        version: &str,
        action: &str,
        ctx: &mut Context,
    ) -> AlpineBitsResult<()> {
        let span = tracing::info_span!(
            "dispatch",
            request_id = %ctx.request_id(),
            version,
            action
        );
        let started = Instant::now();

        let result = self.route_and_execute(version, action, ctx).instrument(span).await;

        let outcome = match &result {
            Ok(()) => "ok",
            Err(error) => error.category().as_str(),
        };
        record_dispatch(version, action, outcome, started.elapsed());
        tracing::info!(
            request_id = %ctx.request_id(),
            version,
            action,
            outcome,
            duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "Dispatched"
        );

        match (result, &self.capture) {
            (Err(error), Some(capture)) => {
                capture.capture_into(ctx, &error);
                Ok(())
            }
            (result, _) => result,
        }
    }

    async fn route_and_execute(
        &self,
        version: &str,
        action: &str,
        ctx: &mut Context,
    ) -> AlpineBitsResult<()> {
        if !self.config.is_enabled(version) {
            tracing::warn!(version, action, "Version disabled");
            return Err(AlpineBitsError::unsupported_version(version));
        }

        ctx.put(&RequestContextKey::REQUEST_VERSION, Version::new(version));
        ctx.put(&RequestContextKey::REQUEST_ACTION, action.to_string());
        ctx.put(&RouterContextKey::ROUTER, Arc::clone(&self.router));

        let chain = match self.router.resolve(version, action) {
            Ok(chain) => chain,
            Err(error) => {
                tracing::warn!(version, action, "No route");
                return Err(error);
            }
        };

        tracing::debug!(steps = ?chain.step_names(), "Executing chain");
        chain.execute(ctx).await
    }
}

fn capture_for(config: &DispatchConfig) -> Option<ErrorCaptureMiddleware> {
    config.capture_errors.then(|| {
        ErrorCaptureMiddleware::new().expose_internal_errors(config.expose_internal_errors)
    })
}
