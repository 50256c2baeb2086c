//! Wire types for streamed completion chunks.
//!
//! One `data:` payload decodes into one [`ChatCompletionChunk`]. The shapes
//! follow the OpenAI-compatible streaming format, plus the provider's in-band
//! error envelope: any payload may carry a top-level `code`/`message` pair
//! instead of (or alongside) choices, and a non-empty `code` means the
//! payload is an error, not a delta.

use serde::{Deserialize, Serialize};

use volc_ai_core::TokenUsage;

/// One streamed unit of an in-progress completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Provider-assigned completion id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model producing the completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Per-candidate deltas. Empty on usage-only terminal chunks.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Token accounting, present on the terminal chunk when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Provider error code; non-empty means this payload is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Provider error message accompanying `code`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChatCompletionChunk {
    /// The provider's error code and message, if this payload carries one.
    pub fn upstream_error(&self) -> Option<(&str, &str)> {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => {
                Some((code, self.message.as_deref().unwrap_or_default()))
            }
            _ => None,
        }
    }
}

/// One candidate's delta within a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Candidate index; always 0 for single-choice requests.
    #[serde(default)]
    pub index: u32,
    /// The partial content carried by this chunk.
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Terminal marker. The provider emits the literal string `"null"` on
    /// non-terminal chunks; both that and absence mean "not finished".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The incremental fields of one delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Role, present on the first chunk of a candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content fragment to append.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool-call fragments to merge by index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChunkToolCall>>,
}

/// A partial tool invocation; fragments sharing an `index` belong to the
/// same call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkToolCall {
    /// Which in-progress call this fragment extends.
    #[serde(default)]
    pub index: u32,
    /// Call id, present on the first fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name and argument fragment.
    #[serde(default)]
    pub function: ChunkFunction,
}

/// The function half of a tool-call fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkFunction {
    /// Tool name, present on the first fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// JSON argument fragment to append.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}
