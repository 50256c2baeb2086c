//! Token accounting reported by the provider.

use serde::{Deserialize, Serialize};

/// Token counts for one completed request.
///
/// In streaming mode this arrives on the terminal chunk, and only when the
/// request asked for it via its stream options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Tokens produced by the model.
    #[serde(default)]
    pub completion_tokens: u32,
    /// Sum of prompt and completion tokens.
    #[serde(default)]
    pub total_tokens: u32,
}
