//! Step adapter running a [`Validator`] inside a chain.

use crate::path::ValidationPath;
use crate::validator::Validator;
use alpinebits_core::{AlpineBitsResult, Context, ContextKey, RequestContextKey};
use alpinebits_middleware::{BoxFuture, Middleware, Next};
use alpinebits_telemetry::metrics::record_validation_failure;
use std::fmt;
use std::marker::PhantomData;

/// Context builder of validators that need no context.
pub type NoContext = fn(&Context) -> AlpineBitsResult<()>;

fn no_context(_ctx: &Context) -> AlpineBitsResult<()> {
    Ok(())
}

/// Step that validates a document stored in the context.
///
/// The document is read from `document`; a missing document is a wiring
/// defect and fails with `MissingContextKey`. The validation context `C` is
/// built from the request context by a closure, typically from the
/// negotiated capabilities. A rejected document aborts the chain with a
/// `Validation` error; a valid one continues it.
///
/// # Example
///
/// ```ignore
/// let step = ValidationMiddleware::without_context(
///     CLOSING_SEASONS,
///     "OTA_HotelInvCountNotifRQ",
///     v2022_10::closing_seasons_overlap_validator(),
/// );
/// ```
pub struct ValidationMiddleware<D, C, V, F> {
    document: ContextKey<D>,
    root: &'static str,
    validator: V,
    context: F,
    _context: PhantomData<fn() -> C>,
}

impl<D, C, V, F> ValidationMiddleware<D, C, V, F>
where
    V: Validator<D, C>,
    F: Fn(&Context) -> AlpineBitsResult<C>,
{
    /// Creates a validation step.
    ///
    /// `root` is the document's root element and starts every error path.
    pub fn new(document: ContextKey<D>, root: &'static str, validator: V, context: F) -> Self {
        Self {
            document,
            root,
            validator,
            context,
            _context: PhantomData,
        }
    }
}

impl<D, V> ValidationMiddleware<D, (), V, NoContext>
where
    V: Validator<D>,
{
    /// Creates a validation step for validators that need no context.
    pub fn without_context(document: ContextKey<D>, root: &'static str, validator: V) -> Self {
        Self::new(document, root, validator, no_context)
    }
}

impl<D, C, V, F> ValidationMiddleware<D, C, V, F>
where
    D: Send + Sync + 'static,
    V: Validator<D, C>,
    F: Fn(&Context) -> AlpineBitsResult<C>,
{
    fn check(&self, ctx: &Context) -> AlpineBitsResult<()> {
        let document = ctx.get_or_err(&self.document)?;
        let validation_ctx = (self.context)(ctx)?;
        let path = ValidationPath::from_path(self.root);

        self.validator
            .validate(document, &validation_ctx, &path)
            .map_err(|err| {
                let version = ctx
                    .get(&RequestContextKey::REQUEST_VERSION)
                    .map_or("unknown", |v| v.as_str());
                record_validation_failure(version);
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    version,
                    path = %err.path,
                    message = %err.message,
                    "Document rejected"
                );
                err.into()
            })
    }
}

impl<D, C, V, F> Middleware for ValidationMiddleware<D, C, V, F>
where
    D: Send + Sync + 'static,
    C: 'static,
    V: Validator<D, C> + 'static,
    F: Fn(&Context) -> AlpineBitsResult<C> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "validation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, AlpineBitsResult<()>> {
        let checked = self.check(ctx);
        Box::pin(async move {
            checked?;
            next.run(ctx).await
        })
    }
}

impl<D, C, V, F> fmt::Debug for ValidationMiddleware<D, C, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationMiddleware")
            .field("document", &self.document.name())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
