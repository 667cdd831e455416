//! Shared utilities for use cases.
//!
//! Cancellation checks and per-call timeouts used by both the decision agent
//! and the ensemble.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A call exceeded its timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimedOut(pub Duration);

/// Whether cancellation has been requested on an optional token.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    token.as_ref().is_some_and(CancellationToken::is_cancelled)
}

/// Await `fut`, giving up after `limit` when one is set.
pub(crate) async fn with_timeout<F: Future>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, TimedOut> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TimedOut(limit)),
        None => Ok(fut.await),
    }
}
