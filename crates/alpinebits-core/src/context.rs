//! Request context types.
//!
//! The [`Context`] carries all per-request state through a middleware chain.
//! Entries are addressed by [`ContextKey`] values, which fix the type of the
//! stored value at the key's definition site.

use crate::error::{AlpineBitsError, AlpineBitsResult};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use alpinebits_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed key for [`Context`] entries.
///
/// The key's name identifies the entry in error messages and logs; the type
/// parameter fixes the type that is written and read back. Keys are usually
/// declared as constants next to the step that produces the value.
///
/// # Example
///
/// ```
/// use alpinebits_core::{Context, ContextKey};
///
/// const ATTEMPTS: ContextKey<u32> = ContextKey::new("attempts");
///
/// let mut ctx = Context::new();
/// ctx.put(&ATTEMPTS, 3);
/// assert_eq!(ctx.get(&ATTEMPTS), Some(&3));
/// ```
pub struct ContextKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ContextKey<T> {
    /// Creates a new key with the given name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the key's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ContextKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ContextKey<T> {}

impl<T> fmt::Debug for ContextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextKey")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for ContextKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Storage slot: the key's name plus the value's type.
type Slot = (&'static str, TypeId);

/// Per-request context that flows through a middleware chain.
///
/// A `Context` is created by the inbound request collaborator, mutated by
/// every step of the resolved chain, and dropped when the request completes.
/// It is never shared between requests, so it needs no synchronization.
///
/// # Example
///
/// ```
/// use alpinebits_core::{AlpineBitsError, Context, ContextKey};
///
/// const PAYLOAD: ContextKey<String> = ContextKey::new("payload");
///
/// let mut ctx = Context::new();
/// assert!(ctx.get(&PAYLOAD).is_none());
/// assert!(matches!(
///     ctx.get_or_err(&PAYLOAD),
///     Err(AlpineBitsError::MissingContextKey { key: "payload" })
/// ));
///
/// ctx.put(&PAYLOAD, "<OTA_PingRQ/>".to_string());
/// assert_eq!(ctx.get_or_err(&PAYLOAD).unwrap(), "<OTA_PingRQ/>");
/// ```
pub struct Context {
    request_id: RequestId,
    entries: HashMap<Slot, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates an empty context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates an empty context with a specific request ID.
    ///
    /// Useful when the request ID was provided by the transport layer.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            entries: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Stores a value under `key`, returning the previous value if any.
    pub fn put<T: Send + Sync + 'static>(&mut self, key: &ContextKey<T>, value: T) -> Option<T> {
        self.entries
            .insert(slot(key), Box::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Returns the value stored under `key`, if present.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, key: &ContextKey<T>) -> Option<&T> {
        self.entries.get(&slot(key)).and_then(|v| v.downcast_ref())
    }

    /// Returns a mutable reference to the value stored under `key`, if present.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self, key: &ContextKey<T>) -> Option<&mut T> {
        self.entries
            .get_mut(&slot(key))
            .and_then(|v| v.downcast_mut())
    }

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AlpineBitsError::MissingContextKey`] naming the key when
    /// no value is stored. This signals a wiring defect: a step was placed
    /// in a chain before the step that produces its input.
    pub fn get_or_err<T: Send + Sync + 'static>(&self, key: &ContextKey<T>) -> AlpineBitsResult<&T> {
        self.get(key)
            .ok_or_else(|| AlpineBitsError::missing_context_key(key.name()))
    }

    /// Removes and returns the value stored under `key`.
    pub fn remove<T: Send + Sync + 'static>(&mut self, key: &ContextKey<T>) -> Option<T> {
        self.entries
            .remove(&slot(key))
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Checks whether a value is stored under `key`.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self, key: &ContextKey<T>) -> bool {
        self.entries.contains_key(&slot(key))
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn slot<T: 'static>(key: &ContextKey<T>) -> Slot {
    (key.name(), TypeId::of::<T>())
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.entries.keys().map(|(name, _)| *name).collect();
        keys.sort_unstable();
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("keys", &keys)
            .finish()
    }
}
