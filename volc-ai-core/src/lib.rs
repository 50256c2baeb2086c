//! Core types for volc-ai.
//!
//! This crate defines the provider-agnostic value types shared by the rest of
//! the workspace: conversation [`Message`]s and their [`Role`]s, sampling
//! [`GenerationSettings`], tool declarations, token usage, and the
//! [`Completion`] that a generation call ultimately produces.
//!
//! # Example
//!
//! ```
//! use volc_ai_core::{GenerationSettings, Message};
//!
//! let messages = vec![
//!     Message::system("You are a helpful assistant."),
//!     Message::user("What is the capital of France?"),
//! ];
//!
//! let settings = GenerationSettings::new()
//!     .temperature(0.2)
//!     .max_tokens(256);
//!
//! assert_eq!(messages.len(), 2);
//! assert_eq!(settings.temperature, Some(0.2));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod completion;
pub mod message;
pub mod settings;
pub mod usage;

pub use completion::{Completion, FinishReason, ToolCall, ToolSpec};
pub use message::{Message, Role, RoleParseError};
pub use settings::{ChatMetadata, GenerationSettings};
pub use usage::TokenUsage;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::completion::{Completion, FinishReason, ToolCall, ToolSpec};
    pub use crate::message::{Message, Role};
    pub use crate::settings::{ChatMetadata, GenerationSettings};
    pub use crate::usage::TokenUsage;
}
