//! Retry strategies for volc-ai.
//!
//! A thin, error-type-agnostic retry layer: the caller's error type
//! implements [`Retryable`] to classify itself, [`RetryConfig`] bounds the
//! attempts and picks a [`WaitStrategy`], and [`with_retry`] /
//! [`with_retry_cancellable`] run the operation.
//!
//! # Example
//!
//! ```no_run
//! use volc_ai_retries::{with_retry, Retryable, RetryConfig};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("transient failure")]
//! struct Transient;
//!
//! impl Retryable for Transient {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn example() -> Result<(), Transient> {
//! let config = RetryConfig::new().max_retries(2);
//! let value = with_retry(&config, || async { Ok::<_, Transient>(42) }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod executor;

pub use config::{RetryConfig, WaitStrategy};
pub use error::{Retryable, RetryError};
pub use executor::{with_retry, with_retry_cancellable};
