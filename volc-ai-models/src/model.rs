//! The chat model capability interface.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use volc_ai_core::{Completion, Message};

use crate::error::ModelResult;

/// A chat completion provider.
///
/// One operation: fold a conversation into a [`Completion`]. Implementations
/// hold only their own configuration; a fresh decode pipeline is created per
/// call, so one instance can serve concurrent calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier sent to the provider.
    fn name(&self) -> &str;

    /// The provider this model talks to.
    fn provider(&self) -> &str;

    /// `provider:name`, for logs.
    fn identifier(&self) -> String {
        format!("{}:{}", self.provider(), self.name())
    }

    /// Run one generation over `messages`.
    ///
    /// A triggered `cancel` token aborts the in-flight request and any
    /// pending retries and fails with
    /// [`ModelError::Cancelled`](crate::ModelError::Cancelled).
    async fn generate(
        &self,
        messages: &[Message],
        cancel: Option<CancellationToken>,
    ) -> ModelResult<Completion>;
}

/// A shared, dynamically typed chat model.
pub type BoxedChatModel = Arc<dyn ChatModel>;
