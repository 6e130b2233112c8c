//! Concurrent per-endpoint query execution.
//!
//! One tokio task is spawned per endpoint and every task is joined before the
//! executor returns, so aggregation always sees the complete round. Each task
//! hands back a typed `Result` through its join handle; there is no shared
//! result map to synchronise.

use super::{
    config::RoundConfig,
    types::{EndpointFailure, FanOutResult, Observation},
};
use crate::upstream::{Endpoint, UpstreamError};
use futures_util::future::join_all;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Runs one query per endpoint concurrently and collects the partial result set.
pub struct FanOutExecutor {
    query_timeout: Option<Duration>,
    limiter: Arc<Semaphore>,
}

impl FanOutExecutor {
    /// Creates an executor allowing `max_concurrent` queries in flight.
    ///
    /// A `max_concurrent` of zero is raised to one.
    #[must_use]
    pub fn new(max_concurrent: usize, query_timeout: Option<Duration>) -> Self {
        Self { query_timeout, limiter: Arc::new(Semaphore::new(max_concurrent.max(1))) }
    }

    #[must_use]
    pub fn from_config(config: &RoundConfig) -> Self {
        Self::new(config.max_concurrent_queries, config.query_timeout())
    }

    /// Executes `query` against every endpoint and waits for all of them.
    ///
    /// Failed, timed-out and panicked queries land in
    /// [`FanOutResult::failures`]; they are never retried. Successes and
    /// failures both keep endpoint-set order.
    pub async fn execute<T, F, Fut>(
        &self,
        operation: &'static str,
        endpoints: &[Endpoint],
        query: F,
    ) -> FanOutResult<T>
    where
        T: Send + 'static,
        F: Fn(Endpoint) -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>> + Send + 'static,
    {
        let handles: Vec<_> = endpoints
            .iter()
            .map(|endpoint| {
                let query_future = query(endpoint.clone());
                let limiter = Arc::clone(&self.limiter);
                let query_timeout = self.query_timeout;

                tokio::spawn(async move {
                    let _permit = limiter.acquire_owned().await.map_err(|_| {
                        UpstreamError::ConcurrencyLimit("fan-out limiter closed".to_string())
                    })?;

                    match query_timeout {
                        Some(limit) => tokio::time::timeout(limit, query_future)
                            .await
                            .unwrap_or(Err(UpstreamError::Timeout)),
                        None => query_future.await,
                    }
                })
            })
            .collect();

        let joined = join_all(handles).await;

        let mut successes = Vec::with_capacity(endpoints.len());
        let mut failures = Vec::new();

        for (endpoint, joined) in endpoints.iter().zip(joined) {
            let outcome = joined.unwrap_or_else(|e| Err(UpstreamError::TaskFailed(e.to_string())));
            match outcome {
                Ok(value) => {
                    debug!(endpoint = %endpoint, operation, "endpoint query succeeded");
                    successes.push(Observation::new(endpoint.clone(), value));
                }
                Err(error) => {
                    warn!(
                        endpoint = %endpoint,
                        operation,
                        kind = error.kind(),
                        error = %error,
                        "endpoint query failed, excluding from round"
                    );
                    failures.push(EndpointFailure { endpoint: endpoint.clone(), error });
                }
            }
        }

        FanOutResult { attempted: endpoints.len(), successes, failures }
    }
}
