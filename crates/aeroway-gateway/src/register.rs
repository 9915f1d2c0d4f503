//! Gateway registration.
//!
//! Mirrors the two ways a gateway comes to life: dial an endpoint and
//! abort registration entirely if the dial fails, or adopt an
//! already-connected client. Both spawn a watcher task that closes the
//! backend connection when the shutdown signal fires, so requests
//! arriving after shutdown are refused instead of hanging.

use crate::client::{Connect, DiscoveryClient};
use crate::connection::Connection;
use crate::gateway::{Gateway, GatewayOptions};
use crate::shutdown::ShutdownSignal;
use aeroway_core::BackendError;
use std::sync::Arc;
use thiserror::Error;

/// Failure to bring a gateway up.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The backend endpoint could not be dialed.
    #[error("failed to dial backend at {endpoint}: {source}")]
    Dial {
        /// The endpoint that was dialed.
        endpoint: String,
        /// The underlying dial failure.
        #[source]
        source: BackendError,
    },
}

/// Dials `endpoint` and registers a gateway over the resulting client.
///
/// A failed dial aborts registration: no gateway, no watcher task.
///
/// # Errors
///
/// Returns [`RegisterError::Dial`] when the connector cannot reach the
/// endpoint.
pub async fn register_from_endpoint(
    shutdown: &ShutdownSignal,
    endpoint: &str,
    connector: &dyn Connect,
    options: GatewayOptions,
) -> Result<Gateway, RegisterError> {
    let client = connector
        .connect(endpoint)
        .await
        .map_err(|source| RegisterError::Dial {
            endpoint: endpoint.to_string(),
            source,
        })?;
    tracing::info!(endpoint, "backend connection established");
    Ok(register_with_client(shutdown, client, options))
}

/// Registers a gateway over an already-connected client.
///
/// Spawns the shutdown watcher, so this must run inside a tokio runtime.
#[must_use]
pub fn register_with_client(
    shutdown: &ShutdownSignal,
    client: Arc<dyn DiscoveryClient>,
    options: GatewayOptions,
) -> Gateway {
    let connection = Arc::new(Connection::ready(client));
    let gateway = Gateway::new(Arc::clone(&connection), options);

    let watcher = shutdown.clone();
    tokio::spawn(async move {
        watcher.recv().await;
        connection.close();
    });

    gateway
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionState;
    use crate::fixtures::{self, StubClient};
    use crate::types::RpcResponse;
    use aeroway_core::ErrorKind;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingConnector;

    #[async_trait]
    impl Connect for FailingConnector {
        async fn connect(&self, _endpoint: &str) -> Result<Arc<dyn DiscoveryClient>, BackendError> {
            Err(BackendError::unavailable("connection refused"))
        }
    }

    struct StubConnector;

    #[async_trait]
    impl Connect for StubConnector {
        async fn connect(&self, _endpoint: &str) -> Result<Arc<dyn DiscoveryClient>, BackendError> {
            Ok(Arc::new(StubClient::ok(RpcResponse::GetSubscription(
                fixtures::get_subscription_response("sub1"),
            ))))
        }
    }

    #[tokio::test]
    async fn test_failed_dial_aborts_registration() {
        let shutdown = ShutdownSignal::new();
        let result = register_from_endpoint(
            &shutdown,
            "backend:8081",
            &FailingConnector,
            GatewayOptions::default(),
        )
        .await;

        let err = match result {
            Err(err) => err,
            Ok(_) => panic!("registration should abort"),
        };
        let RegisterError::Dial { endpoint, source } = err;
        assert_eq!(endpoint, "backend:8081");
        assert_eq!(source.kind, ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn test_successful_dial_yields_ready_gateway() {
        let shutdown = ShutdownSignal::new();
        let gateway = register_from_endpoint(
            &shutdown,
            "backend:8081",
            &StubConnector,
            GatewayOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(gateway.connection().state(), ConnectionState::Ready);
    }

    #[tokio::test]
    async fn test_shutdown_closes_the_connection() {
        let shutdown = ShutdownSignal::new();
        let client = Arc::new(StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        )));
        let gateway = register_with_client(&shutdown, client, GatewayOptions::default());
        assert_eq!(gateway.connection().state(), ConnectionState::Ready);

        shutdown.trigger();

        // The watcher runs asynchronously; poll briefly for the close.
        for _ in 0..100 {
            if gateway.connection().state() == ConnectionState::Closed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(gateway.connection().state(), ConnectionState::Closed);
    }
}
