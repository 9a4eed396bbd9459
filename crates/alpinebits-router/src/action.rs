//! Actions and routing keys.

use alpinebits_core::Version;
use std::borrow::Cow;
use std::fmt;

/// An action a router can serve.
///
/// An action has two names: the *request parameter* the client sends to
/// select it (e.g. `OTA_Ping:Handshaking`) and the *capability* name it is
/// advertised under during a handshake (e.g. `action_OTA_Ping`). Several
/// actions may share one capability; the pull and acknowledge halves of the
/// guest request exchange are both advertised as `action_OTA_Read`.
///
/// # Example
///
/// ```rust
/// use alpinebits_router::Action;
///
/// let action = Action::HANDSHAKING;
/// assert_eq!(action.request_param(), "OTA_Ping:Handshaking");
/// assert_eq!(action.capability(), "action_OTA_Ping");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    request_param: Cow<'static, str>,
    capability: Cow<'static, str>,
}

impl Action {
    /// Handshake (`OTA_Ping`).
    pub const HANDSHAKING: Self = Self::from_static("OTA_Ping:Handshaking", "action_OTA_Ping");
    /// Guest requests, pull.
    pub const GUEST_REQUESTS_PULL: Self =
        Self::from_static("OTA_Read:GuestRequests", "action_OTA_Read");
    /// Guest requests, acknowledgement of pulled requests.
    pub const GUEST_REQUESTS_ACKNOWLEDGE: Self =
        Self::from_static("OTA_NotifReport:GuestRequests", "action_OTA_Read");
    /// Free rooms push, up to 2020-10.
    pub const FREE_ROOMS_HOTEL_AVAIL_NOTIF: Self =
        Self::from_static("OTA_HotelAvailNotif:FreeRooms", "action_OTA_HotelAvailNotif");
    /// Free rooms push, from 2022-10.
    pub const FREE_ROOMS_HOTEL_INV_COUNT_NOTIF: Self = Self::from_static(
        "OTA_HotelInvCountNotif:FreeRooms",
        "action_OTA_HotelInvCountNotif",
    );
    /// Inventory push (basic).
    pub const INVENTORY_BASIC_PUSH: Self = Self::from_static(
        "OTA_HotelDescriptiveContentNotif:Inventory",
        "action_OTA_HotelDescriptiveContentNotif_Inventory",
    );
    /// Inventory push (hotel info).
    pub const INVENTORY_HOTEL_INFO_PUSH: Self = Self::from_static(
        "OTA_HotelDescriptiveContentNotif:Info",
        "action_OTA_HotelDescriptiveContentNotif_Info",
    );
    /// Inventory pull (basic).
    pub const INVENTORY_BASIC_PULL: Self = Self::from_static(
        "OTA_HotelDescriptiveInfo:Inventory",
        "action_OTA_HotelDescriptiveInfo_Inventory",
    );
    /// Inventory pull (hotel info).
    pub const INVENTORY_HOTEL_INFO_PULL: Self = Self::from_static(
        "OTA_HotelDescriptiveInfo:Info",
        "action_OTA_HotelDescriptiveInfo_Info",
    );
    /// Rate plans push.
    pub const RATE_PLANS: Self = Self::from_static(
        "OTA_HotelRatePlanNotif:RatePlans",
        "action_OTA_HotelRatePlanNotif_RatePlans",
    );
    /// Base rates pull.
    pub const BASE_RATES: Self = Self::from_static(
        "OTA_HotelRatePlan:BaseRates",
        "action_OTA_HotelRatePlan_BaseRates",
    );
    /// Activities push.
    pub const ACTIVITIES: Self = Self::from_static(
        "OTA_HotelPostEventNotif:EventReports",
        "action_OTA_HotelPostEventNotif_EventReports",
    );

    /// Creates an action from owned names.
    #[must_use]
    pub fn new(request_param: impl Into<String>, capability: impl Into<String>) -> Self {
        Self {
            request_param: Cow::Owned(request_param.into()),
            capability: Cow::Owned(capability.into()),
        }
    }

    /// Creates an action from static names without allocating.
    #[must_use]
    pub const fn from_static(request_param: &'static str, capability: &'static str) -> Self {
        Self {
            request_param: Cow::Borrowed(request_param),
            capability: Cow::Borrowed(capability),
        }
    }

    /// Returns the request parameter used for routing.
    #[must_use]
    pub fn request_param(&self) -> &str {
        &self.request_param
    }

    /// Returns the capability name advertised in handshakes.
    #[must_use]
    pub fn capability(&self) -> &str {
        &self.capability
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.request_param)
    }
}

/// Routing key: a protocol version plus an action request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionKey {
    version: Version,
    action: String,
}

impl ActionKey {
    /// Creates a routing key.
    #[must_use]
    pub fn new(version: impl Into<Version>, action: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            action: action.into(),
        }
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns the action request parameter.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.version, self.action)
    }
}
