//! The shared backend connection.
//!
//! One long-lived connection is shared by all in-flight requests; the
//! underlying client is expected to multiplex concurrent calls. The
//! connection moves through three states — opening, ready, closed — and
//! never backwards. Once closed, no further calls are permitted: every
//! attempt yields `Unavailable`.

use crate::client::DiscoveryClient;
use aeroway_core::BackendError;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

/// Lifecycle state of the backend connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Dial in progress; no client installed yet.
    Opening,
    /// Client installed and accepting calls.
    Ready,
    /// Torn down; calls are refused.
    Closed,
}

const STATE_OPENING: u8 = 0;
const STATE_READY: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// The channel to the backend, shared across concurrent requests.
pub struct Connection {
    state: AtomicU8,
    client: RwLock<Option<Arc<dyn DiscoveryClient>>>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Creates a connection in the opening state, before the dial
    /// completes.
    #[must_use]
    pub fn opening() -> Self {
        Self {
            state: AtomicU8::new(STATE_OPENING),
            client: RwLock::new(None),
        }
    }

    /// Creates a ready connection around an already-dialed client.
    #[must_use]
    pub fn ready(client: Arc<dyn DiscoveryClient>) -> Self {
        Self {
            state: AtomicU8::new(STATE_READY),
            client: RwLock::new(Some(client)),
        }
    }

    /// Installs the dialed client and moves opening → ready.
    ///
    /// A no-op if the connection was closed while the dial was in flight.
    pub fn open(&self, client: Arc<dyn DiscoveryClient>) {
        let mut slot = self.client.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if self
            .state
            .compare_exchange(STATE_OPENING, STATE_READY, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            *slot = Some(client);
        }
    }

    /// Closes the connection. Idempotent; in-flight calls finish on their
    /// own clone of the client, new calls are refused.
    pub fn close(&self) {
        let previous = self.state.swap(STATE_CLOSED, Ordering::AcqRel);
        let mut slot = self.client.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
        if previous != STATE_CLOSED {
            tracing::info!("backend connection closed");
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        match self.state.load(Ordering::Acquire) {
            STATE_OPENING => ConnectionState::Opening,
            STATE_READY => ConnectionState::Ready,
            _ => ConnectionState::Closed,
        }
    }

    /// Returns a clone of the client for one call.
    ///
    /// Fails with `Unavailable` unless the connection is ready.
    pub fn client(&self) -> Result<Arc<dyn DiscoveryClient>, BackendError> {
        let slot = self.client.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        match (self.state(), slot.as_ref()) {
            (ConnectionState::Ready, Some(client)) => Ok(Arc::clone(client)),
            (ConnectionState::Opening, _) => {
                Err(BackendError::unavailable("backend connection is still opening"))
            }
            _ => Err(BackendError::unavailable("backend connection is closed")),
        }
    }
}
