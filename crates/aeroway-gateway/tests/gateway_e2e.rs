//! End-to-end gateway integration tests.
//!
//! These drive full HTTP requests through [`Gateway::handle`] against a
//! scripted backend and verify the whole translation path:
//!
//! 1. Route matching - method + path against the route table
//! 2. Binding - path variables, query parameters, JSON body
//! 3. Context - bearer token and deadline forwarding
//! 4. Dispatch - one backend call per request
//! 5. Forwarding - buffered JSON payloads, metadata, error envelopes
//! 6. Lifecycle - shutdown closing the connection, cancellation

use aeroway_core::{BackendError, CallMetadata};
use aeroway_gateway::fixtures::{self, StubClient};
use aeroway_gateway::{
    register_with_client, ConnectionState, Gateway, GatewayOptions, RpcRequest, RpcResponse,
    ShutdownSignal,
};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn gateway_over(client: StubClient) -> (Gateway, Arc<StubClient>, ShutdownSignal) {
    let client = Arc::new(client);
    let shutdown = ShutdownSignal::new();
    let gateway = register_with_client(
        &shutdown,
        client.clone(),
        GatewayOptions { call_timeout: None },
    );
    (gateway, client, shutdown)
}

fn get(uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn put(uri: &str, body: Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn body_json(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn extents_json() -> Value {
    json!({
        "spatial_volume": {
            "footprint": {
                "vertices": [
                    {"lat": 37.0, "lng": -122.0},
                    {"lat": 37.1, "lng": -122.0},
                    {"lat": 37.1, "lng": -122.1}
                ]
            },
            "altitude_hi": 120.0
        },
        "time_end": "2023-06-01T00:00:00Z"
    })
}

#[tokio::test]
async fn delete_service_area_binds_the_path_id() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(
        RpcResponse::DeleteIdentificationServiceArea(
            aeroway_gateway::types::DeleteIdentificationServiceAreaResponse {
                service_area: fixtures::service_area("isa1"),
                subscribers: Vec::new(),
            },
        ),
    ));

    let response = gateway
        .handle(delete("/dss/identification_service_areas/isa1"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["service_area"]["id"], "isa1");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0].1 {
        RpcRequest::DeleteIdentificationServiceArea(req) => assert_eq!(req.id, "isa1"),
        other => panic!("wrong operation bound: {other:?}"),
    }
}

#[tokio::test]
async fn put_subscription_binds_body_and_ignores_filtered_query() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(RpcResponse::PutSubscription(
        aeroway_gateway::types::PutSubscriptionResponse {
            subscription: fixtures::subscription("sub1"),
            service_areas: Vec::new(),
        },
    )));

    // `extents` and `id` are claimed by the path and body; their query
    // copies must be ignored, not merged and not rejected.
    let response = gateway
        .handle(put(
            "/dss/subscriptions/sub1?extents=junk&id=other",
            json!({"extents": extents_json()}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0].1 {
        RpcRequest::PutSubscription(req) => {
            assert_eq!(req.id, "sub1");
            let extents = req.extents.as_ref().unwrap();
            assert_eq!(extents.spatial_volume.footprint.vertices.len(), 3);
            assert_eq!(extents.spatial_volume.altitude_hi, Some(120.0));
            assert!(extents.time_end.is_some());
        }
        other => panic!("wrong operation bound: {other:?}"),
    }
}

#[tokio::test]
async fn put_with_empty_body_leaves_extents_absent() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(
        RpcResponse::PutIdentificationServiceArea(fixtures::put_service_area_response("isa1")),
    ));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/dss/identification_service_areas/isa1")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = gateway.handle(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    match &client.calls()[0].1 {
        RpcRequest::PutIdentificationServiceArea(req) => {
            assert_eq!(req.id, "isa1");
            assert!(req.extents.is_none());
        }
        other => panic!("wrong operation bound: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_invalid_argument() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(
        RpcResponse::PutIdentificationServiceArea(fixtures::put_service_area_response("isa1")),
    ));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/dss/identification_service_areas/isa1")
        .body(Full::new(Bytes::from_static(b"{not json")))
        .unwrap();
    let response = gateway.handle(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn search_binds_area_and_time_window_from_the_query() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(
        RpcResponse::SearchIdentificationServiceAreas(
            aeroway_gateway::types::SearchIdentificationServiceAreasResponse {
                service_areas: vec![fixtures::service_area("isa1")],
            },
        ),
    ));

    let response = gateway
        .handle(get(
            "/dss/identification_service_areas\
             ?area=37.0,-122.0,37.1,-122.0,37.1,-122.1\
             &earliest_time=2023-01-01T00:00:00Z",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["service_areas"][0]["id"], "isa1");

    match &client.calls()[0].1 {
        RpcRequest::SearchIdentificationServiceAreas(req) => {
            assert_eq!(req.area, "37.0,-122.0,37.1,-122.0,37.1,-122.1");
            assert!(req.earliest_time.is_some());
            assert!(req.latest_time.is_none());
        }
        other => panic!("wrong operation bound: {other:?}"),
    }
}

#[tokio::test]
async fn backend_not_found_becomes_a_404_envelope() {
    let (gateway, _client, _shutdown) = gateway_over(StubClient::err(BackendError::not_found(
        "no such subscription",
    )));

    let response = gateway.handle(get("/dss/subscriptions/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "no such subscription");
}

#[tokio::test]
async fn bearer_token_travels_to_the_backend() {
    let (gateway, client, _shutdown) = gateway_over(StubClient::ok(RpcResponse::GetSubscription(
        fixtures::get_subscription_response("sub1"),
    )));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/dss/subscriptions/sub1")
        .header("authorization", "Bearer tok123")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = gateway.handle(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = client.calls();
    let ctx = &calls[0].0;
    assert_eq!(ctx.metadata().first("authorization"), Some("Bearer tok123"));
}

#[tokio::test]
async fn backend_metadata_surfaces_as_response_headers() {
    let mut metadata = CallMetadata::new();
    metadata.headers.append("x-request-id", "r1");
    metadata.trailers.append("x-backend-status", "done");
    let (gateway, _client, _shutdown) = gateway_over(
        StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        ))
        .with_metadata(metadata),
    );

    let response = gateway.handle(get("/dss/subscriptions/sub1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "r1");
    // Trailers have nowhere to go on a buffered body.
    assert!(response.headers().get("x-backend-status").is_none());
}

#[tokio::test]
async fn shutdown_refuses_subsequent_requests() {
    let (gateway, client, shutdown) = gateway_over(StubClient::ok(RpcResponse::GetSubscription(
        fixtures::get_subscription_response("sub1"),
    )));

    let response = gateway.handle(get("/dss/subscriptions/sub1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    shutdown.trigger();
    for _ in 0..100 {
        if gateway.connection().state() == ConnectionState::Closed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(gateway.connection().state(), ConnectionState::Closed);

    let response = gateway.handle(get("/dss/subscriptions/sub1")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAVAILABLE");
    // Only the pre-shutdown request reached the backend.
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_elapsing_yields_gateway_timeout() {
    let client = Arc::new(
        StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        ))
        .with_delay(Duration::from_secs(60)),
    );
    let shutdown = ShutdownSignal::new();
    let gateway = register_with_client(
        &shutdown,
        client.clone(),
        GatewayOptions {
            call_timeout: Some(Duration::from_secs(1)),
        },
    );

    let response = gateway.handle(get("/dss/subscriptions/sub1")).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DEADLINE_EXCEEDED");
    assert!(client.was_canceled());
}

#[tokio::test(start_paused = true)]
async fn abandoned_request_cancels_the_backend_call() {
    let client = Arc::new(
        StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        ))
        .with_delay(Duration::from_secs(60)),
    );
    let shutdown = ShutdownSignal::new();
    let gateway = register_with_client(
        &shutdown,
        client.clone(),
        GatewayOptions { call_timeout: None },
    );

    let handle = tokio::spawn(async move { gateway.handle(get("/dss/subscriptions/sub1")).await });

    // Let the request reach the backend sleep, then abandon it.
    tokio::task::yield_now().await;
    assert_eq!(client.calls().len(), 1);
    handle.abort();
    assert!(handle.await.is_err());

    assert!(client.was_canceled());
}
