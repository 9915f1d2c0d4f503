//! The single dispatch routine from bound request to backend call.
//!
//! Every route funnels through [`dispatch`]: fetch the client off the
//! shared connection, invoke the operation the request tags itself with,
//! and race the call against the context deadline. The per-operation
//! match is the only place the request enum fans out.

use crate::client::DiscoveryClient;
use crate::connection::Connection;
use crate::context::CallContext;
use crate::types::{RpcRequest, RpcResponse};
use aeroway_core::{BackendError, CallMetadata};

/// Executes one backend call for an already-bound request.
///
/// Refuses immediately with `Unavailable` when the connection is not
/// ready. When the context carries a deadline and the call outlives it,
/// the call future is dropped and the outcome is `DeadlineExceeded` with
/// empty metadata. Cancellation needs no bookkeeping beyond that: the
/// returned future owns the call, so dropping it drops the call.
pub async fn dispatch(
    connection: &Connection,
    ctx: &CallContext,
    request: RpcRequest,
) -> (Result<RpcResponse, BackendError>, CallMetadata) {
    let client = match connection.client() {
        Ok(client) => client,
        Err(err) => return (Err(err), CallMetadata::new()),
    };

    let operation = request.operation();
    tracing::debug!(operation = operation.name(), "dispatching backend call");

    let call = invoke(client.as_ref(), ctx, request);
    match ctx.deadline() {
        Some(deadline) => match tokio::time::timeout(deadline, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::debug!(
                    operation = operation.name(),
                    ?deadline,
                    "backend call exceeded its deadline"
                );
                let err = BackendError::deadline_exceeded(format!(
                    "{} did not complete within {deadline:?}",
                    operation.name()
                ));
                (Err(err), CallMetadata::new())
            }
        },
        None => call.await,
    }
}

async fn invoke(
    client: &dyn DiscoveryClient,
    ctx: &CallContext,
    request: RpcRequest,
) -> (Result<RpcResponse, BackendError>, CallMetadata) {
    match request {
        RpcRequest::DeleteIdentificationServiceArea(req) => {
            let (result, metadata) = client.delete_identification_service_area(ctx, req).await;
            (result.map(RpcResponse::DeleteIdentificationServiceArea), metadata)
        }
        RpcRequest::DeleteSubscription(req) => {
            let (result, metadata) = client.delete_subscription(ctx, req).await;
            (result.map(RpcResponse::DeleteSubscription), metadata)
        }
        RpcRequest::GetSubscription(req) => {
            let (result, metadata) = client.get_subscription(ctx, req).await;
            (result.map(RpcResponse::GetSubscription), metadata)
        }
        RpcRequest::PutIdentificationServiceArea(req) => {
            let (result, metadata) = client.put_identification_service_area(ctx, req).await;
            (result.map(RpcResponse::PutIdentificationServiceArea), metadata)
        }
        RpcRequest::PutSubscription(req) => {
            let (result, metadata) = client.put_subscription(ctx, req).await;
            (result.map(RpcResponse::PutSubscription), metadata)
        }
        RpcRequest::SearchIdentificationServiceAreas(req) => {
            let (result, metadata) = client.search_identification_service_areas(ctx, req).await;
            (result.map(RpcResponse::SearchIdentificationServiceAreas), metadata)
        }
        RpcRequest::SearchSubscriptions(req) => {
            let (result, metadata) = client.search_subscriptions(ctx, req).await;
            (result.map(RpcResponse::SearchSubscriptions), metadata)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, StubClient};
    use crate::types::GetSubscriptionRequest;
    use aeroway_core::ErrorKind;
    use std::sync::Arc;
    use std::time::Duration;

    fn get_request(id: &str) -> RpcRequest {
        RpcRequest::GetSubscription(GetSubscriptionRequest { id: id.to_string() })
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_matching_operation() {
        let client = Arc::new(StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        )));
        let connection = Connection::ready(client.clone());
        let ctx = CallContext::new();

        let (result, _) = dispatch(&connection, &ctx, get_request("sub1")).await;
        let response = result.unwrap();
        assert_eq!(
            response,
            RpcResponse::GetSubscription(fixtures::get_subscription_response("sub1"))
        );

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, get_request("sub1"));
    }

    #[tokio::test]
    async fn test_backend_error_passes_through_with_metadata() {
        let mut metadata = CallMetadata::new();
        metadata.headers.append("x-request-id", "r1");
        let client = Arc::new(
            StubClient::err(BackendError::not_found("no such subscription"))
                .with_metadata(metadata),
        );
        let connection = Connection::ready(client);
        let ctx = CallContext::new();

        let (result, metadata) = dispatch(&connection, &ctx, get_request("missing")).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(metadata.headers.first("x-request-id"), Some("r1"));
    }

    #[tokio::test]
    async fn test_closed_connection_refuses_without_touching_client() {
        let client = Arc::new(StubClient::ok(RpcResponse::GetSubscription(
            fixtures::get_subscription_response("sub1"),
        )));
        let connection = Connection::ready(client.clone());
        connection.close();

        let ctx = CallContext::new();
        let (result, _) = dispatch(&connection, &ctx, get_request("sub1")).await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::Unavailable);
        assert!(client.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapsing_cancels_the_call() {
        let client = Arc::new(
            StubClient::ok(RpcResponse::GetSubscription(
                fixtures::get_subscription_response("sub1"),
            ))
            .with_delay(Duration::from_secs(60)),
        );
        let connection = Connection::ready(client.clone());
        let ctx = CallContext::new().with_deadline(Duration::from_secs(1));

        let (result, metadata) = dispatch(&connection, &ctx, get_request("sub1")).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DeadlineExceeded);
        assert!(metadata.headers.is_empty());
        // The in-flight call was dropped, not left running.
        assert!(client.was_canceled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_dispatch_cancels_the_call() {
        let client = Arc::new(
            StubClient::ok(RpcResponse::GetSubscription(
                fixtures::get_subscription_response("sub1"),
            ))
            .with_delay(Duration::from_secs(60)),
        );
        let task_client = client.clone();
        let handle = tokio::spawn(async move {
            let connection = Connection::ready(task_client);
            let ctx = CallContext::new();
            dispatch(&connection, &ctx, get_request("sub1")).await
        });

        // Let the call reach its sleep, then abandon it.
        tokio::task::yield_now().await;
        handle.abort();
        let join = handle.await;
        assert!(join.is_err());

        assert_eq!(client.calls().len(), 1);
        assert!(client.was_canceled());
    }
}
