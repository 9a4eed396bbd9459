//! Context keys populated for every inbound request.

use crate::context::ContextKey;
use crate::version::Version;

/// Keys written by the inbound request collaborator before a chain runs.
///
/// The dispatcher fills [`RequestContextKey::REQUEST_VERSION`] and
/// [`RequestContextKey::REQUEST_ACTION`]; the raw payload is written by the
/// transport under [`RequestContextKey::REQUEST_CONTENT`] when the request
/// carries one.
#[derive(Debug, Clone, Copy)]
pub struct RequestContextKey;

impl RequestContextKey {
    /// Protocol version the client requested.
    pub const REQUEST_VERSION: ContextKey<Version> = ContextKey::new("alpinebits.request.version");

    /// Action request parameter (e.g. `OTA_Ping:Handshaking`).
    pub const REQUEST_ACTION: ContextKey<String> = ContextKey::new("alpinebits.request.action");

    /// Raw request payload, when present.
    pub const REQUEST_CONTENT: ContextKey<Vec<u8>> = ContextKey::new("alpinebits.request.content");
}
