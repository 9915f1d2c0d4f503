//! Graceful shutdown signal.
//!
//! Registration ties the backend connection to a [`ShutdownSignal`]: the
//! watcher spawned by [`crate::register_with_client`] waits on the signal
//! and closes the connection when it fires, so requests arriving after
//! shutdown are refused with `Unavailable` instead of hanging. Installing
//! OS signal handlers (SIGTERM, Ctrl+C) is the embedding server's
//! concern; it calls [`ShutdownSignal::trigger`] from wherever those
//! arrive.

use std::sync::Arc;
use tokio::sync::watch;

/// A one-way latch coordinating shutdown across tasks.
///
/// Clones share the same latch: triggering any clone wakes every waiter,
/// and the signal stays triggered from then on.
///
/// # Example
///
/// ```
/// use aeroway_gateway::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let watcher = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(watcher.is_shutdown());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    latch: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (latch, _) = watch::channel(false);
        Self {
            latch: Arc::new(latch),
        }
    }

    /// Fires the signal, waking every waiter. Idempotent.
    pub fn trigger(&self) {
        self.latch.send_replace(true);
    }

    /// Returns `true` once the signal has fired.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.latch.borrow()
    }

    /// Waits until the signal fires.
    ///
    /// Resolves immediately if it already has.
    pub async fn recv(&self) {
        let mut watcher = self.latch.subscribe();
        // The sender lives in self, so the channel cannot close while
        // this call is waiting.
        let _ = watcher.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_latches() {
        let shutdown = ShutdownSignal::new();
        assert!(!shutdown.is_shutdown());

        shutdown.trigger();
        assert!(shutdown.is_shutdown());

        // Firing again changes nothing.
        shutdown.trigger();
        assert!(shutdown.is_shutdown());
    }

    #[test]
    fn test_clones_share_the_latch() {
        let shutdown = ShutdownSignal::new();
        let watcher = shutdown.clone();

        shutdown.trigger();
        assert!(watcher.is_shutdown());
    }

    #[tokio::test]
    async fn test_recv_wakes_on_trigger() {
        let shutdown = ShutdownSignal::new();
        let waiter = shutdown.clone();
        let handle = tokio::spawn(async move {
            waiter.recv().await;
        });

        // The waiter parks until the latch fires.
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }

    #[tokio::test]
    async fn test_recv_resolves_immediately_once_triggered() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_millis(10), shutdown.recv())
            .await
            .expect("recv should not block after trigger");
    }
}
