//! The model error taxonomy.

use thiserror::Error;

use volc_ai_retries::Retryable;
use volc_ai_streaming::StreamError;

/// Everything that can go wrong in a generate call.
///
/// Only [`Transport`](ModelError::Transport) is retryable: an upstream error
/// is the provider's verdict, a protocol error will not improve on replay,
/// and configuration problems are caught before any network traffic.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid client configuration, raised at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection failure, timeout, or a non-2xx response without a
    /// parseable provider error body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider returned an explicit error code and message.
    #[error("upstream error ({code}): {message}")]
    Upstream {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },

    /// Malformed wire data or an unmappable message role.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Cancellation preempted the call.
    #[error("request cancelled")]
    Cancelled,
}

impl ModelError {
    /// A configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        ModelError::Configuration(message.into())
    }

    /// A transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ModelError::Transport(message.into())
    }

    /// An upstream provider error.
    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        ModelError::Upstream {
            code: code.into(),
            message: message.into(),
        }
    }

    /// A protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        ModelError::Protocol(message.into())
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModelError::Transport(_))
    }
}

impl Retryable for ModelError {
    fn is_retryable(&self) -> bool {
        ModelError::is_retryable(self)
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            ModelError::Transport(format!("connection failed: {err}"))
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

impl From<StreamError> for ModelError {
    fn from(err: StreamError) -> Self {
        ModelError::Protocol(err.to_string())
    }
}

impl From<volc_ai_core::RoleParseError> for ModelError {
    fn from(err: volc_ai_core::RoleParseError) -> Self {
        ModelError::Protocol(err.to_string())
    }
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
