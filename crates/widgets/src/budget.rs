//! Shared concurrency ceiling for external queries.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use vantage_core::error::CoreError;

/// A fixed pool of query permits shared by every request.
///
/// Cloning shares the pool. A query holds its permit for the duration of
/// the engine round trip only.
#[derive(Debug, Clone)]
pub struct QueryBudget {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl QueryBudget {
    /// Pool of `limit` permits (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `query` under a permit.
    ///
    /// Waiting for the permit and the query itself both abort with
    /// [`CoreError::Cancelled`] once `cancel` fires; the query future is
    /// dropped at that point.
    pub async fn run<T, F>(&self, cancel: &CancellationToken, query: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CoreError::Cancelled),
            permit = self.permits.acquire() => permit
                .map_err(|_| CoreError::Internal("query budget closed".to_string()))?,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CoreError::Cancelled),
            result = query => result,
        }
    }
}
