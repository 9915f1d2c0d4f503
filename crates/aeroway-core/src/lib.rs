//! Shared types for the Aeroway gateway.
//!
//! This crate holds the pieces every other Aeroway crate agrees on:
//!
//! - [`ErrorKind`] — the categorical error classification used to map
//!   backend failures to HTTP status codes and stable error codes.
//! - [`BackendError`] and [`BindError`] — the failures a request can hit
//!   on its way to and from the backend.
//! - [`ErrorBody`] — the `{code, message}` JSON envelope every failure
//!   response carries.
//! - [`Metadata`] and [`CallMetadata`] — ordered header/trailer multimaps
//!   carried alongside a backend call, apart from the payload.
//!
//! # Status mapping
//!
//! The kind-to-status table is fixed:
//!
//! | Kind | Status |
//! |---|---|
//! | `InvalidArgument` | 400 |
//! | `Unauthenticated` | 401 |
//! | `PermissionDenied` | 403 |
//! | `NotFound` | 404 |
//! | `AlreadyExists` | 409 |
//! | `Unavailable` | 503 |
//! | `DeadlineExceeded` | 504 |
//! | `Internal` / `Unknown` | 500 |

mod error;
mod metadata;

pub use error::{BackendError, BindError, ErrorBody, ErrorKind};
pub use metadata::{CallMetadata, Metadata};
