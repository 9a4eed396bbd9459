//! Context keys owned by the router.

use crate::router::Router;
use alpinebits_core::ContextKey;
use std::sync::Arc;

/// Keys the dispatcher writes so steps can inspect the router serving them.
#[derive(Debug, Clone, Copy)]
pub struct RouterContextKey;

impl RouterContextKey {
    /// The router that resolved the current request.
    pub const ROUTER: ContextKey<Arc<Router>> = ContextKey::new("alpinebits.router");
}
