//! The HTTP front door.
//!
//! [`Gateway`] owns the compiled route table and the shared backend
//! connection, and turns each inbound request into exactly one backend
//! call: match, bind, dispatch, forward. It implements
//! [`hyper::service::Service`] so it can be mounted directly on a hyper
//! connection; cloning is cheap and clones share all state.
//!
//! # Example
//!
//! ```rust,ignore
//! use aeroway_gateway::{register_from_endpoint, GatewayOptions, ShutdownSignal};
//!
//! let shutdown = ShutdownSignal::new();
//! let gateway = register_from_endpoint(
//!     &shutdown,
//!     "backend:8081",
//!     &connector,
//!     GatewayOptions::default(),
//! )
//! .await?;
//!
//! // serve_connection(io, gateway.clone()) per accepted connection
//! ```

use crate::bind::{bind, QueryValues};
use crate::connection::Connection;
use crate::context::CallContext;
use crate::dispatch::dispatch;
use crate::forward::{forward_error, forward_response};
use crate::routes::{self, RouteTemplate, ROUTE_TABLE};
use aeroway_core::{CallMetadata, ErrorKind};
use aeroway_router::Router;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Tunables applied to every request the gateway handles.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Time budget for each backend call. `None` disables the deadline.
    pub call_timeout: Option<Duration>,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(30)),
        }
    }
}

struct GatewayInner {
    router: Router<usize>,
    templates: &'static [RouteTemplate],
    connection: Arc<Connection>,
    options: GatewayOptions,
}

/// The HTTP-to-backend translation service.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("routes", &self.inner.templates.len())
            .field("connection", &self.inner.connection)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Builds a gateway over an existing backend connection.
    ///
    /// Most callers go through [`crate::register_from_endpoint`] or
    /// [`crate::register_with_client`] instead, which also wire up the
    /// shutdown watcher.
    #[must_use]
    pub fn new(connection: Arc<Connection>, options: GatewayOptions) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                router: routes::compile(ROUTE_TABLE),
                templates: ROUTE_TABLE,
                connection,
                options,
            }),
        }
    }

    /// The shared backend connection.
    #[must_use]
    pub fn connection(&self) -> &Arc<Connection> {
        &self.inner.connection
    }

    /// Handles one request end to end.
    ///
    /// Never fails: every outcome, including route misses and binding
    /// failures, is rendered as a buffered JSON response.
    pub async fn handle<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: hyper::body::Body,
        B::Error: Display,
    {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();

        let Some(matched) = self.inner.router.match_route(&parts.method, path) else {
            tracing::debug!(method = %parts.method, path, "no route matched");
            return forward_error(ErrorKind::NotFound, "Not Found", &CallMetadata::new());
        };
        let template = &self.inner.templates[matched.template];
        tracing::debug!(
            method = %parts.method,
            path,
            operation = template.operation.name(),
            "route matched"
        );

        // Only routes with a body-bound field read the body at all.
        let body = if template.body_field.is_some() {
            match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    return forward_error(
                        ErrorKind::InvalidArgument,
                        &format!("failed to read request body: {err}"),
                        &CallMetadata::new(),
                    );
                }
            }
        } else {
            Bytes::new()
        };

        let query = match QueryValues::parse(parts.uri.query()) {
            Ok(query) => query,
            Err(err) => {
                return forward_error(err.kind(), &err.to_string(), &CallMetadata::new())
            }
        };

        let bound = match bind(template, &matched.vars, &query, &body) {
            Ok(bound) => bound,
            Err(err) => {
                tracing::debug!(
                    operation = template.operation.name(),
                    error = %err,
                    "request failed to bind"
                );
                return forward_error(err.kind(), &err.to_string(), &CallMetadata::new());
            }
        };

        let ctx = CallContext::from_headers(&parts.headers, self.inner.options.call_timeout);
        let (result, metadata) = dispatch(&self.inner.connection, &ctx, bound).await;
        match result {
            Ok(response) => forward_response(&response, &metadata),
            Err(err) => forward_error(err.kind, &err.message, &metadata),
        }
    }
}

impl hyper::service::Service<Request<Incoming>> for Gateway {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn call(&self, request: Request<Incoming>) -> Self::Future {
        let gateway = self.clone();
        Box::pin(async move { Ok(gateway.handle(request).await) })
    }
}
