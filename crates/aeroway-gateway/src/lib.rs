//! HTTP front door for a geospatial discovery backend.
//!
//! `aeroway-gateway` translates a fixed REST surface into typed calls on
//! an abstract backend client. Each inbound request flows through four
//! stages, each owned by one module:
//!
//! 1. **Match** ([`routes`], backed by `aeroway-router`): resolve the
//!    method and path against the declarative route table. Path
//!    variables bind during the walk; a miss is a `404` before anything
//!    else runs.
//! 2. **Bind** ([`bind`]): fold path variables, query parameters, and
//!    the optional JSON body into one typed request. Path wins over
//!    query; fields claimed by the route's filter set are never read
//!    from the query.
//! 3. **Dispatch** ([`dispatch`]): one backend call per request over the
//!    shared [`Connection`], raced against the configured deadline.
//!    Dropping the request future drops the call.
//! 4. **Forward** ([`forward`]): buffer the full JSON payload, apply the
//!    backend's header metadata verbatim, and flush. Failures become a
//!    structured `{"code", "message"}` envelope with a status drawn from
//!    a fixed table.
//!
//! The backend itself stays abstract: implement [`DiscoveryClient`] (and
//! [`Connect`] for dialing) over whatever transport you run.
//!
//! # Example
//!
//! ```
//! use aeroway_gateway::fixtures::{self, StubClient};
//! use aeroway_gateway::{register_with_client, GatewayOptions, RpcResponse, ShutdownSignal};
//! use bytes::Bytes;
//! use http::Request;
//! use http_body_util::Full;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let shutdown = ShutdownSignal::new();
//! let client = Arc::new(StubClient::ok(RpcResponse::GetSubscription(
//!     fixtures::get_subscription_response("sub1"),
//! )));
//! let gateway = register_with_client(&shutdown, client, GatewayOptions::default());
//!
//! let request = Request::builder()
//!     .method(http::Method::GET)
//!     .uri("/dss/subscriptions/sub1")
//!     .body(Full::new(Bytes::new()))
//!     .unwrap();
//! let response = gateway.handle(request).await;
//! assert_eq!(response.status(), http::StatusCode::OK);
//!
//! // After shutdown, the connection closes and calls are refused.
//! shutdown.trigger();
//! # }
//! ```

pub mod bind;
pub mod client;
pub mod connection;
pub mod context;
pub mod dispatch;
pub mod fixtures;
pub mod forward;
pub mod gateway;
pub mod register;
pub mod routes;
pub mod shutdown;
pub mod types;

pub use bind::QueryValues;
pub use client::{CallResult, Connect, DiscoveryClient};
pub use connection::{Connection, ConnectionState};
pub use context::CallContext;
pub use dispatch::dispatch;
pub use forward::{forward_error, forward_response};
pub use gateway::{Gateway, GatewayOptions};
pub use register::{register_from_endpoint, register_with_client, RegisterError};
pub use routes::{RouteTemplate, ROUTE_TABLE};
pub use shutdown::ShutdownSignal;
pub use types::{Operation, RpcRequest, RpcResponse};
