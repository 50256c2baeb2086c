//! Finished-generation types: finish reasons, tool calls, and the
//! accumulated completion itself.

use serde::{Deserialize, Serialize};

use crate::usage::TokenUsage;

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of output.
    Stop,
    /// The token limit was reached.
    Length,
    /// The model wants one or more tools invoked.
    ToolCalls,
}

impl FinishReason {
    /// Interpret a finish-reason field from the wire.
    ///
    /// Returns `None` for an absent value and for the literal string
    /// `"null"`, which this provider emits on non-terminal chunks. Reasons
    /// outside the known set are treated as a natural stop.
    pub fn from_wire(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("null") | Some("") => None,
            Some("length") => Some(FinishReason::Length),
            Some("tool_calls") => Some(FinishReason::ToolCalls),
            Some(_) => Some(FinishReason::Stop),
        }
    }
}

/// A tool the model may call, declared on the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name, unique within the request.
    pub name: String,
    /// What the tool does, shown to the model.
    pub description: String,
    /// JSON schema of the tool's arguments.
    pub parameters: serde_json::Value,
}

/// A fully assembled tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as a JSON-encoded string, concatenated from every
    /// fragment the stream carried for this call.
    pub arguments: String,
}

/// The final result of one generation call.
///
/// Built incrementally from streamed deltas or mapped directly from a
/// non-streaming response body. `finish_reason` is `None` only when the
/// stream ended before the provider sent a finishing chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Provider-assigned completion id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model that produced the completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Concatenation of every content delta in arrival order.
    pub text: String,
    /// Terminal marker, if the provider sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Assembled tool calls, in fragment-index order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tool_calls: Vec<ToolCall>,
    /// Token accounting, when the provider reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// True when the model asked for tools rather than (or in addition to)
    /// producing text. The tool-calls finish reason is authoritative.
    pub fn wants_tool_calls(&self) -> bool {
        self.finish_reason == Some(FinishReason::ToolCalls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_wire_maps_the_known_set() {
        assert_eq!(FinishReason::from_wire(Some("stop")), Some(FinishReason::Stop));
        assert_eq!(FinishReason::from_wire(Some("length")), Some(FinishReason::Length));
        assert_eq!(
            FinishReason::from_wire(Some("tool_calls")),
            Some(FinishReason::ToolCalls)
        );
    }

    #[test]
    fn from_wire_treats_null_string_as_absent() {
        assert_eq!(FinishReason::from_wire(None), None);
        assert_eq!(FinishReason::from_wire(Some("null")), None);
        assert_eq!(FinishReason::from_wire(Some("")), None);
    }

    #[test]
    fn from_wire_maps_unknown_reasons_to_stop() {
        assert_eq!(
            FinishReason::from_wire(Some("content_filter")),
            Some(FinishReason::Stop)
        );
    }

    #[test]
    fn wants_tool_calls_follows_finish_reason() {
        let completion = Completion {
            finish_reason: Some(FinishReason::ToolCalls),
            ..Default::default()
        };
        assert!(completion.wants_tool_calls());
        assert!(!Completion::default().wants_tool_calls());
    }
}
