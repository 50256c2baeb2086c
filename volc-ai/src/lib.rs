//! Streaming chat-completion client and event bridge for the Volcengine Ark
//! API.
//!
//! The workspace splits into four layers, re-exported here:
//!
//! - [`core`]: messages, settings, and the accumulated [`Completion`].
//! - [`streaming`]: SSE decoding, delta accumulation, and the
//!   heartbeat-sustained [`EventBridge`].
//! - [`retries`]: backoff policies and the cancellable retry executor.
//! - [`models`]: the [`ChatModel`] trait and [`VolcChatModel`].
//!
//! # Generating a completion
//!
//! ```no_run
//! use volc_ai::prelude::*;
//!
//! # async fn example() -> Result<(), ModelError> {
//! let model = VolcChatModel::new(VolcChatParams {
//!     streaming: true,
//!     stream_options: Some(StreamOptions { include_usage: true }),
//!     ..VolcChatParams::from_env("doubao-pro-32k")
//! })?;
//!
//! let completion = model
//!     .generate(&[Message::user("Summarize SSE in one sentence.")], None)
//!     .await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```
//!
//! # Bridging a long-running generation
//!
//! The bridge forwards producer events verbatim, fills idle gaps with
//! heartbeats, and propagates unsubscription back into the transport via its
//! cancellation token:
//!
//! ```no_run
//! use futures::StreamExt;
//! use volc_ai::prelude::*;
//!
//! # async fn example(producer: volc_ai::streaming::EventProducer) {
//! let bridge = EventBridge::new();
//! let cancel = bridge.cancellation_token();
//! // Hand `cancel` to the producing generate call, then:
//! let mut events = bridge.run(producer);
//! while let Some(event) = events.next().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub use volc_ai_core as core;
pub use volc_ai_models as models;
pub use volc_ai_retries as retries;
pub use volc_ai_streaming as streaming;

pub use volc_ai_core::{
    ChatMetadata, Completion, FinishReason, GenerationSettings, Message, Role, TokenUsage,
    ToolCall, ToolSpec,
};
pub use volc_ai_models::{
    BoxedChatModel, ChatModel, ModelError, ModelResult, StreamOptions, VolcChatModel,
    VolcChatParams,
};
pub use volc_ai_retries::{RetryConfig, WaitStrategy};
pub use volc_ai_streaming::{
    BridgeStream, DeltaAccumulator, EventBridge, HeartbeatConfig, SseLineDecoder, StreamError,
};

/// Everything most callers need, importable in one line.
pub mod prelude {
    pub use volc_ai_core::prelude::*;
    pub use volc_ai_models::prelude::*;
    pub use volc_ai_retries::{RetryConfig, WaitStrategy};
    pub use volc_ai_streaming::prelude::*;
}
