//! Streaming error types.

use thiserror::Error;

/// Errors raised while decoding or accumulating a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The response body contained bytes that are not valid UTF-8.
    #[error("invalid UTF-8 in stream: {0}")]
    Utf8(String),

    /// A `data:` payload was not valid JSON.
    #[error("JSON error in stream payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The residual line buffer grew past its limit without a line
    /// terminator arriving.
    #[error("stream buffer overflow: exceeded {limit} bytes")]
    BufferOverflow {
        /// The configured limit in bytes.
        limit: usize,
    },

    /// A chunk arrived after the accumulator already finalized its result.
    #[error("chunk received after the completion was finalized")]
    AlreadyFinalized,
}

/// Result alias for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;
