//! Translation of backend outcomes into HTTP responses.
//!
//! Responses are buffered in full before any byte reaches the wire, so a
//! payload that fails to serialize still yields a clean `500` envelope
//! instead of a truncated body. Backend header metadata is applied to the
//! response verbatim; trailer metadata has nowhere to go on a buffered
//! body and is dropped with a warning.

use aeroway_core::{CallMetadata, ErrorBody, ErrorKind, Metadata};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Stable error code for payloads the gateway itself failed to encode.
const CODE_SERIALIZATION: &str = "SERIALIZATION_ERROR";

/// Renders a successful backend response.
///
/// Serialization is all-or-nothing: a failure discards the buffered
/// payload and degrades to a `500` error envelope, still carrying the
/// backend's header metadata.
pub fn forward_response<T: Serialize>(
    payload: &T,
    metadata: &CallMetadata,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(payload) {
        Ok(buf) => build(StatusCode::OK, buf, metadata),
        Err(err) => {
            tracing::error!(error = %err, "response payload failed to serialize");
            let body = ErrorBody {
                code: CODE_SERIALIZATION.to_string(),
                message: "response payload failed to serialize".to_string(),
            };
            build(
                StatusCode::INTERNAL_SERVER_ERROR,
                encode_error(&body),
                metadata,
            )
        }
    }
}

/// Renders an error outcome as the structured JSON envelope.
pub fn forward_error(
    kind: ErrorKind,
    message: &str,
    metadata: &CallMetadata,
) -> Response<Full<Bytes>> {
    let body = ErrorBody::new(kind, message);
    build(kind.status_code(), encode_error(&body), metadata)
}

fn encode_error(body: &ErrorBody) -> Vec<u8> {
    // ErrorBody is two strings; encoding it cannot realistically fail.
    serde_json::to_vec(body)
        .unwrap_or_else(|_| br#"{"code":"INTERNAL","message":"internal error"}"#.to_vec())
}

fn build(status: StatusCode, buf: Vec<u8>, metadata: &CallMetadata) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(buf)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    apply_headers(&mut response, &metadata.headers);
    drop_trailers(&metadata.trailers);
    response
}

fn apply_headers(response: &mut Response<Full<Bytes>>, headers: &Metadata) {
    for (key, value) in headers.iter() {
        match (HeaderName::try_from(key), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => {
                tracing::warn!(key, "dropping metadata entry not representable as an HTTP header");
            }
        }
    }
}

fn drop_trailers(trailers: &Metadata) {
    for (key, _) in trailers.iter() {
        tracing::warn!(key, "dropping trailer metadata; buffered responses carry no trailers");
    }
}
