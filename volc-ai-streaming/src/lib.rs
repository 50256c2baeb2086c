//! Streaming machinery for volc-ai.
//!
//! Three layers live here, bottom up:
//!
//! - [`SseLineDecoder`] turns the raw, arbitrarily-chunked bytes of one HTTP
//!   response body into discrete `data:` payloads, handling multi-byte
//!   characters split across reads and the `[DONE]` sentinel.
//! - [`DeltaAccumulator`] folds the decoded [`ChatCompletionChunk`]s into a
//!   single [`Completion`](volc_ai_core::Completion), merging content deltas
//!   and multi-fragment tool-call arguments.
//! - [`EventBridge`] wraps a producer stream in a subscriber-facing stream
//!   that interleaves keepalive heartbeats and propagates cancellation back
//!   into the producer.
//!
//! [`Settlement`] is the exactly-once guard the client uses so a finishing
//! chunk and a racing transport error cannot both settle one call.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod chunk;
pub mod delta;
pub mod error;
pub mod settle;
pub mod sse;

pub use bridge::{BridgeStream, EventBridge, EventProducer, HeartbeatConfig, HeartbeatEvent};
pub use chunk::{ChatCompletionChunk, ChunkChoice, ChunkDelta, ChunkFunction, ChunkToolCall};
pub use delta::{DeltaAccumulator, IngestOutcome};
pub use error::{StreamError, StreamResult};
pub use settle::Settlement;
pub use sse::SseLineDecoder;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::bridge::{BridgeStream, EventBridge, HeartbeatConfig};
    pub use crate::chunk::ChatCompletionChunk;
    pub use crate::delta::{DeltaAccumulator, IngestOutcome};
    pub use crate::error::{StreamError, StreamResult};
    pub use crate::settle::Settlement;
    pub use crate::sse::SseLineDecoder;
}
