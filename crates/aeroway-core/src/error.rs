//! Error taxonomy and status mapping.
//!
//! Errors are classified by [`ErrorKind`], a categorical classification
//! independent of message text. The kind decides both the HTTP status and
//! the stable `code` string in the response envelope; the message travels
//! alongside verbatim. The gateway never retries on any of these — retry
//! policy belongs to the caller.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorical classification of a failed call.
///
/// Mirrors the status vocabulary of the backend RPC layer. Every kind maps
/// to exactly one HTTP status and one stable error code, so a given failure
/// always produces the same envelope regardless of message text.
///
/// # Example
///
/// ```
/// use aeroway_core::ErrorKind;
/// use http::StatusCode;
///
/// assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
/// assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The request was malformed or failed validation.
    InvalidArgument,
    /// Missing or invalid credentials.
    Unauthenticated,
    /// The caller is not allowed to perform the operation.
    PermissionDenied,
    /// The referenced entity does not exist.
    NotFound,
    /// The entity already exists or the version conflicts.
    AlreadyExists,
    /// The backend is unreachable or refusing calls.
    Unavailable,
    /// The call did not complete within its deadline.
    DeadlineExceeded,
    /// The backend failed internally.
    Internal,
    /// The failure could not be classified.
    Unknown,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable error code for the response envelope.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Unavailable => "UNAVAILABLE",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Internal => "INTERNAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// An error returned by (or on behalf of) the backend.
///
/// The kind is surfaced to the client through the status mapping; the
/// message is surfaced verbatim in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", kind.code())]
pub struct BackendError {
    /// Categorical classification.
    pub kind: ErrorKind,
    /// Human-readable detail, passed through verbatim.
    pub message: String,
}

impl BackendError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an `Unavailable` error, the kind used when the backend is
    /// unreachable or the connection has been closed.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a `DeadlineExceeded` error.
    #[must_use]
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeadlineExceeded, message)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

/// A failure while assembling a typed request from path, query and body.
///
/// Binding failures never reach the backend. They are all reported as
/// [`ErrorKind::InvalidArgument`] (HTTP 400), matching the upstream RPC
/// convention where missing or mistyped parameters are invalid arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A path variable declared by the route was not captured.
    #[error("missing parameter {0}")]
    MissingPathParam(String),

    /// A captured value could not be parsed into the declared field type.
    #[error("type mismatch, parameter: {field}, value: {raw}")]
    TypeMismatch {
        /// Field the value was bound to.
        field: String,
        /// The raw value that failed to parse.
        raw: String,
    },

    /// The request body was present but could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The query string could not be decoded.
    #[error("malformed query string: {0}")]
    MalformedQuery(String),
}

impl BindError {
    /// The kind all binding failures map to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl From<BindError> for BackendError {
    fn from(err: BindError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// The structured JSON body carried by every failure response.
///
/// ```json
/// {"code": "NOT_FOUND", "message": "no such subscription"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code (see [`ErrorKind::code`]).
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

impl ErrorBody {
    /// Creates an envelope from a kind and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.code().to_string(),
            message: message.into(),
        }
    }
}
