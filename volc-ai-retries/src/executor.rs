//! The retry loops.

use std::fmt::Display;
use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::error::{Retryable, RetryError};

/// Run `operation`, retrying retryable failures up to the configured bound.
///
/// The error's own [`retry_after`](Retryable::retry_after) overrides the
/// configured wait when present. The final error is returned unchanged.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if attempt > config.max_retries || !err.is_retryable() {
                    return Err(err);
                }
                let wait = err.retry_after().unwrap_or_else(|| config.wait.calculate(attempt));
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

/// Like [`with_retry`], but a cancelled token aborts the in-flight attempt
/// and any pending backoff wait immediately.
///
/// A token already cancelled on entry fails before the first attempt;
/// cancellation is never followed by another attempt.
pub async fn with_retry_cancellable<T, E, F, Fut>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            result = operation() => result,
        };
        match result {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt > config.max_retries || !err.is_retryable() {
                    return Err(RetryError::Inner(err));
                }
                let wait = err.retry_after().unwrap_or_else(|| config.wait.calculate(attempt));
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    wait_ms = wait.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }
    }
}
