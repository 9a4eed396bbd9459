//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that every chain step
//! implements, and the [`Next`] continuation a step uses to resume the
//! remainder of its chain.
//!
//! # Example
//!
//! ```
//! use alpinebits_core::{AlpineBitsResult, Context, ContextKey};
//! use alpinebits_middleware::{BoxFuture, Middleware, Next};
//!
//! const VISITS: ContextKey<u32> = ContextKey::new("visits");
//!
//! struct CountingMiddleware;
//!
//! impl Middleware for CountingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "counting"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut Context,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, AlpineBitsResult<()>> {
//!         Box::pin(async move {
//!             let visits = ctx.get(&VISITS).copied().unwrap_or(0);
//!             ctx.put(&VISITS, visits + 1);
//!             next.run(ctx).await
//!         })
//!     }
//! }
//! ```

use crate::chain::BoxedMiddleware;
use alpinebits_core::{AlpineBitsResult, Context};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A boxed future, as returned by [`Middleware::process`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// A middleware is one step of a [`Chain`](crate::Chain). It receives the
/// per-request context and a [`Next`] continuation for the rest of the
/// chain.
///
/// # Invariants
///
/// - Middleware MAY call `next.run()` at most once; `Next` is consumed by the call
/// - Middleware that does not call `next.run()` short-circuits the chain
/// - Middleware MUST NOT keep per-request state in `self`; use the context
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this step.
    ///
    /// This name is used for logging and chain introspection.
    fn name(&self) -> &'static str;

    /// Processes the context through this step.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The mutable per-request context
    /// * `next` - Continuation invoking the rest of the chain
    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, AlpineBitsResult<()>>;
}

/// Continuation invoking the remainder of a chain.
///
/// `Next` borrows the steps that follow the current one. Calling
/// [`Next::run`] consumes it, which makes invoking the continuation twice
/// a compile error rather than a runtime failure.
pub struct Next<'a> {
    remaining: &'a [BoxedMiddleware],
}

impl<'a> Next<'a> {
    /// Creates a continuation over the given steps.
    pub(crate) fn new(remaining: &'a [BoxedMiddleware]) -> Self {
        Self { remaining }
    }

    /// Returns true if no steps remain after the current one.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Returns the number of steps that remain.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Invokes the next step in the chain.
    ///
    /// Completes immediately with `Ok(())` at the end of the chain.
    pub async fn run(self, ctx: &mut Context) -> AlpineBitsResult<()> {
        match self.remaining.split_first() {
            Some((middleware, rest)) => {
                tracing::trace!(
                    request_id = %ctx.request_id(),
                    step = middleware.name(),
                    "Entering step"
                );
                middleware.process(ctx, Next::new(rest)).await
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.remaining.iter().map(|m| m.name()).collect();
        f.debug_struct("Next").field("remaining", &names).finish()
    }
}

/// A middleware created from a function or closure.
///
/// Use [`from_fn`] to construct one.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

/// Creates a middleware from a function.
///
/// The function receives the context and the continuation, exactly like
/// [`Middleware::process`].
///
/// # Example
///
/// ```
/// use alpinebits_core::{AlpineBitsResult, Context};
/// use alpinebits_middleware::{from_fn, BoxFuture, Middleware, Next};
///
/// // Ends the chain without calling `next`.
/// let stop = from_fn("stop", |_ctx, _next| {
///     Box::pin(async { Ok(()) })
/// });
/// assert_eq!(stop.name(), "stop");
/// ```
pub fn from_fn<F>(name: &'static str, func: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, AlpineBitsResult<()>>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware { name, func }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, AlpineBitsResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, AlpineBitsResult<()>> {
        (self.func)(ctx, next)
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpinebits_core::ContextKey;
    use std::sync::Arc;

    const VISITED: ContextKey<Vec<&'static str>> = ContextKey::new("visited");

    struct TestMiddleware {
        name: &'static str,
    }

    impl Middleware for TestMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut Context,
            next: Next<'a>,
        ) -> BoxFuture<'a, AlpineBitsResult<()>> {
            Box::pin(async move {
                if let Some(visited) = ctx.get_mut(&VISITED) {
                    visited.push(self.name);
                } else {
                    ctx.put(&VISITED, vec![self.name]);
                }
                next.run(ctx).await
            })
        }
    }

    #[tokio::test]
    async fn test_middleware_name() {
        let mw = TestMiddleware { name: "test" };
        assert_eq!(mw.name(), "test");
    }

    #[tokio::test]
    async fn test_next_at_end_is_ok() {
        let mut ctx = Context::new();
        let next = Next::new(&[]);
        assert!(next.is_end());
        assert!(next.run(&mut ctx).await.is_ok());
        assert!(ctx.is_empty());
    }

    #[tokio::test]
    async fn test_next_runs_remaining_steps() {
        let steps: Vec<BoxedMiddleware> = vec![
            Arc::new(TestMiddleware { name: "first" }),
            Arc::new(TestMiddleware { name: "second" }),
        ];

        let mut ctx = Context::new();
        let next = Next::new(&steps);
        assert_eq!(next.remaining(), 2);
        next.run(&mut ctx).await.unwrap();

        assert_eq!(ctx.get(&VISITED), Some(&vec!["first", "second"]));
    }

    #[tokio::test]
    async fn test_fn_middleware() {
        let mw = from_fn(
            "fn",
            |ctx, next| {
                Box::pin(async move {
                    ctx.put(&VISITED, vec!["fn"]);
                    next.run(ctx).await
                })
            },
        );
        assert_eq!(mw.name(), "fn");

        let mut ctx = Context::new();
        mw.process(&mut ctx, Next::new(&[])).await.unwrap();
        assert_eq!(ctx.get(&VISITED), Some(&vec!["fn"]));
    }
}
