//! The field binder: assembles a typed request from path, query and body.
//!
//! Binding order is fixed: the body is decoded first, then path variables,
//! then query parameters. Query keys named in the route's filter set are
//! skipped because path or body already populated those fields — query
//! data never overwrites them. Unknown query keys are ignored. Repeated
//! query keys populate multi-value fields in appearance order.
//!
//! Every failure here is reported before the backend is ever invoked.

use crate::routes::RouteTemplate;
use crate::types::{
    DeleteIdentificationServiceAreaRequest, DeleteSubscriptionRequest, GetSubscriptionRequest,
    Operation, PutIdentificationServiceAreaRequest, PutSubscriptionRequest, RpcRequest,
    SearchIdentificationServiceAreasRequest, SearchSubscriptionsRequest, Volume4D,
};
use aeroway_core::BindError;
use aeroway_router::PathVars;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Query parameters, decoded once and kept in appearance order.
///
/// Repeated keys are preserved as separate pairs so multi-value fields
/// can be populated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    pairs: Vec<(String, String)>,
}

impl QueryValues {
    /// Decodes a raw query string (without the leading `?`).
    ///
    /// `None` or an empty string yields an empty set. A string that is not
    /// valid `application/x-www-form-urlencoded` is a malformed request.
    pub fn parse(query: Option<&str>) -> Result<Self, BindError> {
        let Some(query) = query else {
            return Ok(Self::default());
        };
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| BindError::MalformedQuery(e.to_string()))?;
        Ok(Self { pairs })
    }

    /// Returns the first value for a key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values for a key, in appearance order.
    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no parameters are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A scalar value parseable from a path variable or query parameter.
///
/// Implemented for the declared scalar field types: strings, integers,
/// booleans and timestamps. Enumerated fields implement this by matching
/// their variant names.
pub trait Scalar: Sized {
    /// Parses the raw string form, returning `None` on mismatch.
    fn parse_scalar(raw: &str) -> Option<Self>;
}

impl Scalar for String {
    fn parse_scalar(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl Scalar for i32 {
    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for i64 {
    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for u32 {
    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for bool {
    fn parse_scalar(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl Scalar for DateTime<Utc> {
    fn parse_scalar(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Binds a declared path variable into a scalar field.
pub fn path_var<T: Scalar>(vars: &PathVars, field: &str) -> Result<T, BindError> {
    let raw = vars
        .get(field)
        .ok_or_else(|| BindError::MissingPathParam(field.to_string()))?;
    T::parse_scalar(raw).ok_or_else(|| BindError::TypeMismatch {
        field: field.to_string(),
        raw: raw.to_string(),
    })
}

/// Binds an optional scalar field from the query string.
///
/// Returns `None` without looking at the query when the field is in the
/// filter set (already populated from path or body) or the key is absent.
pub fn query_value<T: Scalar>(
    query: &QueryValues,
    filter: &[&str],
    field: &str,
) -> Result<Option<T>, BindError> {
    if filter.contains(&field) {
        return Ok(None);
    }
    match query.first(field) {
        None => Ok(None),
        Some(raw) => T::parse_scalar(raw)
            .map(Some)
            .ok_or_else(|| BindError::TypeMismatch {
                field: field.to_string(),
                raw: raw.to_string(),
            }),
    }
}

/// Binds a multi-value scalar field from repeated query keys, preserving
/// appearance order.
pub fn query_repeated<T: Scalar>(
    query: &QueryValues,
    filter: &[&str],
    field: &str,
) -> Result<Vec<T>, BindError> {
    if filter.contains(&field) {
        return Ok(Vec::new());
    }
    query
        .all(field)
        .map(|raw| {
            T::parse_scalar(raw).ok_or_else(|| BindError::TypeMismatch {
                field: field.to_string(),
                raw: raw.to_string(),
            })
        })
        .collect()
}

/// Extracts the body-bound field from a JSON request body.
///
/// An empty body leaves the field unset — the backend decides whether the
/// field was required. A non-empty body must be a JSON object; the named
/// field is decoded if present, and everything else in the body is left
/// for the backend to reject.
pub fn body_field<T: DeserializeOwned>(body: &Bytes, field: &str) -> Result<Option<T>, BindError> {
    if body.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| BindError::MalformedBody(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(BindError::MalformedBody("expected a JSON object".to_string()));
    };
    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(inner) => serde_json::from_value(inner.clone())
            .map(Some)
            .map_err(|e| BindError::MalformedBody(format!("field {field}: {e}"))),
    }
}

/// Assembles the typed request for a matched route.
///
/// Same inputs always produce the same request: binding has no side
/// effects and reads each source exactly once.
pub fn bind(
    template: &RouteTemplate,
    vars: &PathVars,
    query: &QueryValues,
    body: &Bytes,
) -> Result<RpcRequest, BindError> {
    let filter = template.query_filter;
    match template.operation {
        Operation::DeleteIdentificationServiceArea => {
            Ok(RpcRequest::DeleteIdentificationServiceArea(
                DeleteIdentificationServiceAreaRequest {
                    id: path_var(vars, "id")?,
                },
            ))
        }
        Operation::DeleteSubscription => Ok(RpcRequest::DeleteSubscription(
            DeleteSubscriptionRequest {
                id: path_var(vars, "id")?,
            },
        )),
        Operation::GetSubscription => Ok(RpcRequest::GetSubscription(GetSubscriptionRequest {
            id: path_var(vars, "id")?,
        })),
        Operation::PutIdentificationServiceArea => {
            let extents: Option<Volume4D> = bound_body(template, body)?;
            Ok(RpcRequest::PutIdentificationServiceArea(
                PutIdentificationServiceAreaRequest {
                    id: path_var(vars, "id")?,
                    extents,
                },
            ))
        }
        Operation::PutSubscription => {
            let extents: Option<Volume4D> = bound_body(template, body)?;
            Ok(RpcRequest::PutSubscription(PutSubscriptionRequest {
                id: path_var(vars, "id")?,
                extents,
            }))
        }
        Operation::SearchIdentificationServiceAreas => {
            Ok(RpcRequest::SearchIdentificationServiceAreas(
                SearchIdentificationServiceAreasRequest {
                    area: query_value(query, filter, "area")?.unwrap_or_default(),
                    earliest_time: query_value(query, filter, "earliest_time")?,
                    latest_time: query_value(query, filter, "latest_time")?,
                },
            ))
        }
        Operation::SearchSubscriptions => Ok(RpcRequest::SearchSubscriptions(
            SearchSubscriptionsRequest {
                area: query_value(query, filter, "area")?.unwrap_or_default(),
            },
        )),
    }
}

/// Decodes the template's body-bound field, if the route declares one.
fn bound_body<T: DeserializeOwned>(
    template: &RouteTemplate,
    body: &Bytes,
) -> Result<Option<T>, BindError> {
    match template.body_field {
        Some(field) => body_field(body, field),
        None => Ok(None),
    }
}
