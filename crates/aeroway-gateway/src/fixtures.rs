//! Test fixtures for gateway development and testing.
//!
//! Provides a scripted [`StubClient`] standing in for the backend, plus
//! pre-built domain entities, used by tests across the workspace.
//!
//! # Example
//!
//! ```
//! use aeroway_gateway::fixtures::{self, StubClient};
//! use aeroway_gateway::RpcResponse;
//!
//! let client = StubClient::ok(RpcResponse::GetSubscription(
//!     fixtures::get_subscription_response("sub1"),
//! ));
//! assert!(!client.was_canceled());
//! ```

use crate::client::{CallResult, DiscoveryClient};
use crate::context::CallContext;
use crate::types::{
    DeleteIdentificationServiceAreaRequest, DeleteIdentificationServiceAreaResponse,
    DeleteSubscriptionRequest, DeleteSubscriptionResponse, GetSubscriptionRequest,
    GetSubscriptionResponse, IdentificationServiceArea, PutIdentificationServiceAreaRequest,
    PutIdentificationServiceAreaResponse, PutSubscriptionRequest, PutSubscriptionResponse,
    RpcRequest, RpcResponse, SearchIdentificationServiceAreasRequest,
    SearchIdentificationServiceAreasResponse, SearchSubscriptionsRequest,
    SearchSubscriptionsResponse, Subscription,
};
use aeroway_core::{BackendError, CallMetadata};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A pre-built subscription entity.
#[must_use]
pub fn subscription(id: &str) -> Subscription {
    Subscription {
        id: id.to_string(),
        owner: "uss1".to_string(),
        callbacks: None,
        notification_index: 1,
        time_start: None,
        time_end: None,
        version: "v1".to_string(),
    }
}

/// A pre-built identification service area entity.
#[must_use]
pub fn service_area(id: &str) -> IdentificationServiceArea {
    IdentificationServiceArea {
        id: id.to_string(),
        owner: "uss1".to_string(),
        flights_url: format!("https://uss1.example.com/flights/{id}"),
        time_start: None,
        time_end: None,
        version: "v1".to_string(),
    }
}

/// A pre-built response for fetching a subscription.
#[must_use]
pub fn get_subscription_response(id: &str) -> GetSubscriptionResponse {
    GetSubscriptionResponse {
        subscription: subscription(id),
    }
}

/// A pre-built response for deleting a subscription.
#[must_use]
pub fn delete_subscription_response(id: &str) -> DeleteSubscriptionResponse {
    DeleteSubscriptionResponse {
        subscription: subscription(id),
    }
}

/// A pre-built response for storing an identification service area.
#[must_use]
pub fn put_service_area_response(id: &str) -> PutIdentificationServiceAreaResponse {
    PutIdentificationServiceAreaResponse {
        service_area: service_area(id),
        subscribers: Vec::new(),
    }
}

/// A scripted backend client.
///
/// Every operation records the call, optionally sleeps (so deadline and
/// cancellation behavior can be exercised), then replays the scripted
/// result. Dropping an in-flight call mid-sleep marks the client
/// canceled.
pub struct StubClient {
    script: Result<RpcResponse, BackendError>,
    metadata: CallMetadata,
    delay: Option<Duration>,
    calls: Mutex<Vec<(CallContext, RpcRequest)>>,
    canceled: Arc<AtomicBool>,
}

impl StubClient {
    /// A client that answers every call with the given response.
    #[must_use]
    pub fn ok(response: RpcResponse) -> Self {
        Self::scripted(Ok(response))
    }

    /// A client that fails every call with the given error.
    #[must_use]
    pub fn err(error: BackendError) -> Self {
        Self::scripted(Err(error))
    }

    fn scripted(script: Result<RpcResponse, BackendError>) -> Self {
        Self {
            script,
            metadata: CallMetadata::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
            canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attaches metadata returned with every call, success or failure.
    #[must_use]
    pub fn with_metadata(mut self, metadata: CallMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Makes every call sleep before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(CallContext, RpcRequest)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if an in-flight call was dropped before completing.
    #[must_use]
    pub fn was_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    async fn run(&self, ctx: &CallContext, request: RpcRequest) -> Result<RpcResponse, BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((ctx.clone(), request));

        if let Some(delay) = self.delay {
            let guard = CancelGuard {
                flag: Arc::clone(&self.canceled),
                armed: true,
            };
            tokio::time::sleep(delay).await;
            guard.disarm();
        }

        self.script.clone()
    }
}

struct CancelGuard {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl CancelGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Release);
        }
    }
}

// Request and response enum variants share the operation's name, so one
// variant identifier drives both sides of each method.
macro_rules! stub_client_impl {
    ($($name:ident($request:ty) -> $response:ty [$variant:ident];)+) => {
        #[async_trait]
        impl DiscoveryClient for StubClient {
            $(
                async fn $name(
                    &self,
                    ctx: &CallContext,
                    request: $request,
                ) -> CallResult<$response> {
                    let result = match self.run(ctx, RpcRequest::$variant(request)).await {
                        Ok(RpcResponse::$variant(response)) => Ok(response),
                        Ok(other) => panic!(
                            "stub scripted with {other:?} but {} was called",
                            stringify!($name)
                        ),
                        Err(err) => Err(err),
                    };
                    (result, self.metadata.clone())
                }
            )+
        }
    };
}

stub_client_impl! {
    delete_identification_service_area(DeleteIdentificationServiceAreaRequest)
        -> DeleteIdentificationServiceAreaResponse [DeleteIdentificationServiceArea];
    delete_subscription(DeleteSubscriptionRequest)
        -> DeleteSubscriptionResponse [DeleteSubscription];
    get_subscription(GetSubscriptionRequest)
        -> GetSubscriptionResponse [GetSubscription];
    put_identification_service_area(PutIdentificationServiceAreaRequest)
        -> PutIdentificationServiceAreaResponse [PutIdentificationServiceArea];
    put_subscription(PutSubscriptionRequest)
        -> PutSubscriptionResponse [PutSubscription];
    search_identification_service_areas(SearchIdentificationServiceAreasRequest)
        -> SearchIdentificationServiceAreasResponse [SearchIdentificationServiceAreas];
    search_subscriptions(SearchSubscriptionsRequest)
        -> SearchSubscriptionsResponse [SearchSubscriptions];
}
