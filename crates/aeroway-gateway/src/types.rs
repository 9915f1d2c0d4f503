//! Typed request and response model for the discovery backend.
//!
//! The gateway assembles one typed request per operation from path, query
//! and body data, and serializes the backend's typed response as the HTTP
//! body. The shapes mirror the backend's wire messages: PUT bodies carry a
//! four-dimensional `extents` volume, search operations take an `area`
//! vertex list and an optional time window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude vertex in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// A polygon footprint on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPolygon {
    /// Vertices in winding order.
    pub vertices: Vec<LatLngPoint>,
}

/// A footprint extruded over an altitude range, in meters above the
/// WGS-84 ellipsoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialVolume {
    /// Surface footprint.
    pub footprint: GeoPolygon,
    /// Lower altitude bound, if bounded below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_lo: Option<f64>,
    /// Upper altitude bound, if bounded above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_hi: Option<f64>,
}

/// A spatial volume bounded in time: the `extents` every PUT body carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume4D {
    /// The spatial component.
    pub spatial_volume: SpatialVolume,
    /// Start of the time window, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<DateTime<Utc>>,
    /// End of the time window, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<DateTime<Utc>>,
}

/// An identification service area registered with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationServiceArea {
    /// Entity identifier.
    pub id: String,
    /// Owning service supplier.
    pub owner: String,
    /// Where flight data for this area is served.
    pub flights_url: String,
    /// Start of the active window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<DateTime<Utc>>,
    /// End of the active window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<DateTime<Utc>>,
    /// Opaque version tag, changes on every mutation.
    pub version: String,
}

/// Notification endpoints for a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCallbacks {
    /// Where service-area change notifications are delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification_service_area_url: Option<String>,
}

/// A subscription to changes within a volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Entity identifier.
    pub id: String,
    /// Owning service supplier.
    pub owner: String,
    /// Notification endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<SubscriptionCallbacks>,
    /// Monotonic index incremented on each notification.
    pub notification_index: i32,
    /// Start of the active window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<DateTime<Utc>>,
    /// End of the active window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<DateTime<Utc>>,
    /// Opaque version tag, changes on every mutation.
    pub version: String,
}

/// A subscriber that must be notified about a service-area change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberToNotify {
    /// Notification URL.
    pub url: String,
    /// Notification index to send.
    pub notification_index: i32,
}

// --- Requests -------------------------------------------------------------

/// Request to delete an identification service area by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteIdentificationServiceAreaRequest {
    /// Entity identifier, bound from the path.
    pub id: String,
}

/// Request to delete a subscription by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteSubscriptionRequest {
    /// Entity identifier, bound from the path.
    pub id: String,
}

/// Request to fetch a subscription by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetSubscriptionRequest {
    /// Entity identifier, bound from the path.
    pub id: String,
}

/// Request to create or update an identification service area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PutIdentificationServiceAreaRequest {
    /// Entity identifier, bound from the path.
    pub id: String,
    /// Extents, bound from the body (absent when the body is empty).
    pub extents: Option<Volume4D>,
}

/// Request to create or update a subscription.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PutSubscriptionRequest {
    /// Entity identifier, bound from the path.
    pub id: String,
    /// Extents, bound from the body (absent when the body is empty).
    pub extents: Option<Volume4D>,
}

/// Request to search identification service areas by volume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchIdentificationServiceAreasRequest {
    /// Comma-separated `lat,lng` vertex list, bound from the query.
    pub area: String,
    /// Only areas active at or after this instant.
    pub earliest_time: Option<DateTime<Utc>>,
    /// Only areas active at or before this instant.
    pub latest_time: Option<DateTime<Utc>>,
}

/// Request to search subscriptions by area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSubscriptionsRequest {
    /// Comma-separated `lat,lng` vertex list, bound from the query.
    pub area: String,
}

// --- Responses ------------------------------------------------------------

/// Response to deleting an identification service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteIdentificationServiceAreaResponse {
    /// The deleted area.
    pub service_area: IdentificationServiceArea,
    /// Subscribers that must be notified of the deletion.
    pub subscribers: Vec<SubscriberToNotify>,
}

/// Response to deleting a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSubscriptionResponse {
    /// The deleted subscription.
    pub subscription: Subscription,
}

/// Response to fetching a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetSubscriptionResponse {
    /// The subscription.
    pub subscription: Subscription,
}

/// Response to creating or updating an identification service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutIdentificationServiceAreaResponse {
    /// The stored area.
    pub service_area: IdentificationServiceArea,
    /// Subscribers that must be notified of the change.
    pub subscribers: Vec<SubscriberToNotify>,
}

/// Response to creating or updating a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutSubscriptionResponse {
    /// The stored subscription.
    pub subscription: Subscription,
    /// Areas already intersecting the subscribed volume.
    pub service_areas: Vec<IdentificationServiceArea>,
}

/// Response to searching identification service areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIdentificationServiceAreasResponse {
    /// Areas intersecting the searched volume.
    pub service_areas: Vec<IdentificationServiceArea>,
}

/// Response to searching subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSubscriptionsResponse {
    /// Subscriptions owned by the caller in the searched area.
    pub subscriptions: Vec<Subscription>,
}

// --- Tagged operation variants ---------------------------------------------

/// The backend operations the gateway forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `DELETE /dss/identification_service_areas/{id}`
    DeleteIdentificationServiceArea,
    /// `DELETE /dss/subscriptions/{id}`
    DeleteSubscription,
    /// `GET /dss/subscriptions/{id}`
    GetSubscription,
    /// `PUT /dss/identification_service_areas/{id}`
    PutIdentificationServiceArea,
    /// `PUT /dss/subscriptions/{id}`
    PutSubscription,
    /// `GET /dss/identification_service_areas`
    SearchIdentificationServiceAreas,
    /// `GET /dss/subscriptions`
    SearchSubscriptions,
}

impl Operation {
    /// Returns the operation name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeleteIdentificationServiceArea => "DeleteIdentificationServiceArea",
            Self::DeleteSubscription => "DeleteSubscription",
            Self::GetSubscription => "GetSubscription",
            Self::PutIdentificationServiceArea => "PutIdentificationServiceArea",
            Self::PutSubscription => "PutSubscription",
            Self::SearchIdentificationServiceAreas => "SearchIdentificationServiceAreas",
            Self::SearchSubscriptions => "SearchSubscriptions",
        }
    }
}

/// A bound request, tagged by operation.
///
/// The dispatcher matches on this tag to pick the client call — one
/// generic dispatch routine instead of one handler closure per route.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcRequest {
    /// Delete an identification service area.
    DeleteIdentificationServiceArea(DeleteIdentificationServiceAreaRequest),
    /// Delete a subscription.
    DeleteSubscription(DeleteSubscriptionRequest),
    /// Fetch a subscription.
    GetSubscription(GetSubscriptionRequest),
    /// Create or update an identification service area.
    PutIdentificationServiceArea(PutIdentificationServiceAreaRequest),
    /// Create or update a subscription.
    PutSubscription(PutSubscriptionRequest),
    /// Search identification service areas.
    SearchIdentificationServiceAreas(SearchIdentificationServiceAreasRequest),
    /// Search subscriptions.
    SearchSubscriptions(SearchSubscriptionsRequest),
}

impl RpcRequest {
    /// Returns the operation this request targets.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::DeleteIdentificationServiceArea(_) => Operation::DeleteIdentificationServiceArea,
            Self::DeleteSubscription(_) => Operation::DeleteSubscription,
            Self::GetSubscription(_) => Operation::GetSubscription,
            Self::PutIdentificationServiceArea(_) => Operation::PutIdentificationServiceArea,
            Self::PutSubscription(_) => Operation::PutSubscription,
            Self::SearchIdentificationServiceAreas(_) => Operation::SearchIdentificationServiceAreas,
            Self::SearchSubscriptions(_) => Operation::SearchSubscriptions,
        }
    }
}

/// A typed backend response, tagged by operation.
///
/// Serializes as the bare response message (no tag), which is what the
/// HTTP client sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    /// Response to [`Operation::DeleteIdentificationServiceArea`].
    DeleteIdentificationServiceArea(DeleteIdentificationServiceAreaResponse),
    /// Response to [`Operation::DeleteSubscription`].
    DeleteSubscription(DeleteSubscriptionResponse),
    /// Response to [`Operation::GetSubscription`].
    GetSubscription(GetSubscriptionResponse),
    /// Response to [`Operation::PutIdentificationServiceArea`].
    PutIdentificationServiceArea(PutIdentificationServiceAreaResponse),
    /// Response to [`Operation::PutSubscription`].
    PutSubscription(PutSubscriptionResponse),
    /// Response to [`Operation::SearchIdentificationServiceAreas`].
    SearchIdentificationServiceAreas(SearchIdentificationServiceAreasResponse),
    /// Response to [`Operation::SearchSubscriptions`].
    SearchSubscriptions(SearchSubscriptionsResponse),
}
