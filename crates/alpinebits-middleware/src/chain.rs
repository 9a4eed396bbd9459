//! Ordered, immutable middleware chains.
//!
//! A [`Chain`] is the unit the router resolves a (version, action) pair to.
//! It is built once, append-only, through a [`ChainBuilder`] and then shared
//! (`Arc<Chain>`) by every request that targets the action. Each call to
//! [`Chain::execute`] creates its own continuations bound to that call's
//! context, so concurrent executions never share mutable state.

use crate::middleware::{Middleware, Next};
use alpinebits_core::{AlpineBitsError, AlpineBitsResult, Context};
use futures_util::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered, immutable sequence of middleware steps.
///
/// # Example
///
/// ```ignore
/// use alpinebits_middleware::Chain;
///
/// let chain = Chain::builder()
///     .step(ParseRequestMiddleware::new())
///     .step(ValidationMiddleware::new(...))
///     .step(HandshakingMiddleware::new())
///     .build();
///
/// chain.execute(&mut ctx).await?;
/// ```
#[derive(Clone)]
pub struct Chain {
    steps: Vec<BoxedMiddleware>,
}

impl Chain {
    /// Creates a new chain builder.
    #[must_use]
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// Creates a chain that runs a single step.
    #[must_use]
    pub fn single<M: Middleware>(middleware: M) -> Self {
        Self::builder().step(middleware).build()
    }

    /// Runs the chain against a context.
    ///
    /// Steps run in registration order. Execution ends after the last step,
    /// or earlier when a step does not call its continuation.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a step, unchanged. A step that
    /// panics is reported as [`AlpineBitsError::ChainContract`]; entries it
    /// wrote to the context before panicking are left in place.
    pub async fn execute(&self, ctx: &mut Context) -> AlpineBitsResult<()> {
        let request_id = ctx.request_id();
        match AssertUnwindSafe(Next::new(&self.steps).run(ctx))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(
                    request_id = %request_id,
                    steps = ?self.step_names(),
                    panic = %message,
                    "Step panicked during chain execution"
                );
                Err(AlpineBitsError::chain_contract(format!(
                    "step panicked: {message}"
                )))
            }
        }
    }

    /// Returns the names of all steps in order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("steps", &self.step_names())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Builder for constructing a [`Chain`].
///
/// Steps are appended in the order they should run.
#[derive(Default)]
pub struct ChainBuilder {
    steps: Vec<BoxedMiddleware>,
}

impl ChainBuilder {
    /// Creates an empty chain builder.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    #[must_use]
    pub fn step<M: Middleware>(mut self, middleware: M) -> Self {
        self.steps.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared step.
    ///
    /// Useful when the same stateless step instance is reused by several
    /// chains.
    #[must_use]
    pub fn shared_step(mut self, middleware: BoxedMiddleware) -> Self {
        self.steps.push(middleware);
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> Chain {
        Chain { steps: self.steps }
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps.iter().map(|m| m.name()).collect();
        f.debug_struct("ChainBuilder").field("steps", &names).finish()
    }
}
