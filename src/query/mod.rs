//! Query cancellation collaborator.

use crate::error::{FaultlineError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Cancels an in-flight query on the query engine.
///
/// Implementations should be idempotent; the translator may call this for a
/// query that has already finished.
#[async_trait]
pub trait QueryCanceller: Send + Sync + 'static {
    async fn cancel_query(&self, query_id: &str) -> Result<()>;
}

/// A canceller for deployments without a query engine.
#[derive(Debug, Clone, Default)]
pub struct NoopQueryCanceller;

#[async_trait]
impl QueryCanceller for NoopQueryCanceller {
    async fn cancel_query(&self, query_id: &str) -> Result<()> {
        tracing::debug!("No query engine configured, ignoring cancel for {}", query_id);
        Ok(())
    }
}

/// Start cancelling `query_id` on a detached task.
///
/// The caller never awaits the returned handle; failures are logged by the
/// task itself.
pub fn spawn_cancel(canceller: Arc<dyn QueryCanceller>, query_id: String) -> Result<JoinHandle<()>> {
    let handle = Handle::try_current().map_err(|e| FaultlineError::NoRuntime(e.to_string()))?;

    Ok(handle.spawn(async move {
        match canceller.cancel_query(&query_id).await {
            Ok(()) => tracing::info!("Cancelled query {} after client disconnect", query_id),
            Err(e) => tracing::warn!("Failed to cancel query {}: {}", query_id, e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingCanceller;

    #[async_trait]
    impl QueryCanceller for FailingCanceller {
        async fn cancel_query(&self, query_id: &str) -> Result<()> {
            Err(FaultlineError::cancel_failed(query_id, "engine unreachable"))
        }
    }

    #[tokio::test]
    async fn test_failed_cancel_does_not_panic_task() {
        let handle = spawn_cancel(Arc::new(FailingCanceller), "q-1".to_string()).unwrap();
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_noop_canceller_succeeds() {
        assert!(NoopQueryCanceller.cancel_query("q-1").await.is_ok());
    }

    #[test]
    fn test_spawn_without_runtime_reports_error() {
        let result = spawn_cancel(Arc::new(NoopQueryCanceller), "q-1".to_string());
        assert!(matches!(result, Err(FaultlineError::NoRuntime(_))));
    }
}
