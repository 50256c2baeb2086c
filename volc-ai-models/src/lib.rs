//! Chat model implementations for volc-ai.
//!
//! [`ChatModel`] is the capability interface the rest of the workspace
//! consumes: one operation, `generate`, taking the conversation so far and an
//! optional cancellation token and returning the accumulated
//! [`Completion`](volc_ai_core::Completion). [`VolcChatModel`] implements it
//! against the Volcengine Ark OpenAI-compatible endpoint, in both streaming
//! and non-streaming modes, with retries on transient transport failures.
//!
//! # Example
//!
//! ```no_run
//! use volc_ai_core::Message;
//! use volc_ai_models::{ChatModel, VolcChatModel, VolcChatParams};
//!
//! # async fn example() -> Result<(), volc_ai_models::ModelError> {
//! let model = VolcChatModel::new(VolcChatParams::from_env("doubao-pro-32k"))?;
//! let completion = model
//!     .generate(&[Message::user("Hello!")], None)
//!     .await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod model;
pub mod volc;

pub use error::{ModelError, ModelResult};
pub use model::{BoxedChatModel, ChatModel};
pub use volc::types::StreamOptions;
pub use volc::{VolcChatModel, VolcChatParams};

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::model::{BoxedChatModel, ChatModel};
    pub use crate::volc::types::StreamOptions;
    pub use crate::volc::{VolcChatModel, VolcChatParams};
}
