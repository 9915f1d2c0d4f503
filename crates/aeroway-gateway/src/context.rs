//! Per-call context: forwarded metadata and deadline.
//!
//! The inbound HTTP exchange annotates every backend call with the
//! caller's bearer token and an optional deadline. Cancellation itself is
//! structural: the backend call future lives inside the request handler
//! future, so dropping the inbound request drops the call.

use aeroway_core::Metadata;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use std::time::Duration;

/// Context threaded through one backend call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    metadata: Metadata,
    deadline: Option<Duration>,
}

impl CallContext {
    /// Creates an empty context with no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from the inbound request headers.
    ///
    /// The `Authorization` header is forwarded to the backend as the
    /// `authorization` metadata entry; token validation is the backend's
    /// (or its verifier's) concern. Other inbound headers stay behind.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, deadline: Option<Duration>) -> Self {
        let mut metadata = Metadata::new();
        if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            metadata.append("authorization", value);
        }
        Self { metadata, deadline }
    }

    /// Sets the remaining time budget for the call.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Adds a metadata entry forwarded to the backend.
    pub fn append_metadata(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.metadata.append(key, value);
    }

    /// Metadata forwarded to the backend.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Remaining time budget, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
