//! The declarative route table.
//!
//! Each entry maps an HTTP method and path shape to a backend operation,
//! names the field the request body binds into (if any), and lists the
//! fields the query string must never overwrite because path or body
//! already populated them. The table is plain data interpreted by the
//! matcher and binder; it is compiled once at registration and immutable
//! afterwards.

use crate::types::Operation;
use aeroway_router::Router;
use http::Method;

/// One route template: a method and path shape bound to an operation.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    /// HTTP method.
    pub method: Method,
    /// Path pattern with `{name}` variable segments.
    pub pattern: &'static str,
    /// The backend operation this route invokes.
    pub operation: Operation,
    /// The request field the decoded body binds into, if the route
    /// accepts a body.
    pub body_field: Option<&'static str>,
    /// Fields already populated from path or body; query keys with these
    /// names are skipped during binding.
    pub query_filter: &'static [&'static str],
}

/// The gateway's route table.
pub static ROUTE_TABLE: &[RouteTemplate] = &[
    RouteTemplate {
        method: Method::DELETE,
        pattern: "/dss/identification_service_areas/{id}",
        operation: Operation::DeleteIdentificationServiceArea,
        body_field: None,
        query_filter: &[],
    },
    RouteTemplate {
        method: Method::DELETE,
        pattern: "/dss/subscriptions/{id}",
        operation: Operation::DeleteSubscription,
        body_field: None,
        query_filter: &[],
    },
    RouteTemplate {
        method: Method::GET,
        pattern: "/dss/subscriptions/{id}",
        operation: Operation::GetSubscription,
        body_field: None,
        query_filter: &[],
    },
    RouteTemplate {
        method: Method::PUT,
        pattern: "/dss/identification_service_areas/{id}",
        operation: Operation::PutIdentificationServiceArea,
        body_field: Some("extents"),
        query_filter: &["extents", "id"],
    },
    RouteTemplate {
        method: Method::PUT,
        pattern: "/dss/subscriptions/{id}",
        operation: Operation::PutSubscription,
        body_field: Some("extents"),
        query_filter: &["extents", "id"],
    },
    RouteTemplate {
        method: Method::GET,
        pattern: "/dss/identification_service_areas",
        operation: Operation::SearchIdentificationServiceAreas,
        body_field: None,
        query_filter: &[],
    },
    RouteTemplate {
        method: Method::GET,
        pattern: "/dss/subscriptions",
        operation: Operation::SearchSubscriptions,
        body_field: None,
        query_filter: &[],
    },
];

/// Compiles the route table into a matcher keyed by table index.
#[must_use]
pub(crate) fn compile(templates: &'static [RouteTemplate]) -> Router<usize> {
    let mut router = Router::new();
    for (index, template) in templates.iter().enumerate() {
        router.route(template.method.clone(), template.pattern, index);
    }
    router
}
