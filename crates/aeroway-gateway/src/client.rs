//! The abstract Service Client.
//!
//! The gateway consumes the discovery backend exclusively through
//! [`DiscoveryClient`]: one method per operation, each taking a
//! [`CallContext`] and returning the typed response together with whatever
//! header/trailer metadata the backend produced — metadata is captured
//! regardless of whether the call succeeded.
//!
//! Dialing is equally abstract: [`Connect`] turns an endpoint string into
//! a live client. Transports (and their retry/consistency behavior) live
//! behind these traits and out of the gateway's scope.

use crate::context::CallContext;
use crate::types::{
    DeleteIdentificationServiceAreaRequest, DeleteIdentificationServiceAreaResponse,
    DeleteSubscriptionRequest, DeleteSubscriptionResponse, GetSubscriptionRequest,
    GetSubscriptionResponse, PutIdentificationServiceAreaRequest,
    PutIdentificationServiceAreaResponse, PutSubscriptionRequest, PutSubscriptionResponse,
    SearchIdentificationServiceAreasRequest, SearchIdentificationServiceAreasResponse,
    SearchSubscriptionsRequest, SearchSubscriptionsResponse,
};
use aeroway_core::{BackendError, CallMetadata};
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of one backend call: the typed result plus captured metadata.
pub type CallResult<T> = (Result<T, BackendError>, CallMetadata);

/// The backend operation capability set the gateway forwards to.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Deletes an identification service area.
    async fn delete_identification_service_area(
        &self,
        ctx: &CallContext,
        request: DeleteIdentificationServiceAreaRequest,
    ) -> CallResult<DeleteIdentificationServiceAreaResponse>;

    /// Deletes a subscription.
    async fn delete_subscription(
        &self,
        ctx: &CallContext,
        request: DeleteSubscriptionRequest,
    ) -> CallResult<DeleteSubscriptionResponse>;

    /// Fetches a subscription.
    async fn get_subscription(
        &self,
        ctx: &CallContext,
        request: GetSubscriptionRequest,
    ) -> CallResult<GetSubscriptionResponse>;

    /// Creates or updates an identification service area.
    async fn put_identification_service_area(
        &self,
        ctx: &CallContext,
        request: PutIdentificationServiceAreaRequest,
    ) -> CallResult<PutIdentificationServiceAreaResponse>;

    /// Creates or updates a subscription.
    async fn put_subscription(
        &self,
        ctx: &CallContext,
        request: PutSubscriptionRequest,
    ) -> CallResult<PutSubscriptionResponse>;

    /// Searches identification service areas.
    async fn search_identification_service_areas(
        &self,
        ctx: &CallContext,
        request: SearchIdentificationServiceAreasRequest,
    ) -> CallResult<SearchIdentificationServiceAreasResponse>;

    /// Searches subscriptions.
    async fn search_subscriptions(
        &self,
        ctx: &CallContext,
        request: SearchSubscriptionsRequest,
    ) -> CallResult<SearchSubscriptionsResponse>;
}

/// Dials an endpoint and produces a live [`DiscoveryClient`].
///
/// A failed dial must return an error rather than a lazily-failing
/// client: registration aborts entirely when the dial fails.
#[async_trait]
pub trait Connect: Send + Sync {
    /// Connects to the backend at `endpoint`.
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn DiscoveryClient>, BackendError>;
}
