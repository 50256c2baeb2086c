//! Retry classification and the cancellable executor's error type.

use std::time::Duration;

use thiserror::Error;

/// Lets an error type drive retry decisions.
///
/// Implemented by the caller on its own error enum; only transient failures
/// (connection resets, timeouts, 5xx without a parseable body) should report
/// `true`.
pub trait Retryable {
    /// Whether another attempt could plausibly succeed.
    fn is_retryable(&self) -> bool;

    /// A server-mandated wait that overrides the configured strategy, such
    /// as a `Retry-After` header.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Outcome of a cancellable retried operation.
#[derive(Debug, Error, PartialEq)]
pub enum RetryError<E> {
    /// The operation failed and was not (or could no longer be) retried.
    #[error(transparent)]
    Inner(#[from] E),

    /// Cancellation preempted the operation or a pending backoff wait.
    #[error("operation cancelled")]
    Cancelled,
}
