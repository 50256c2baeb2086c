//! Wire types for the Volcengine Ark chat-completion API.
//!
//! The API is OpenAI-compatible, with one provider quirk: any response body
//! or stream payload may carry a top-level `code`/`message` error envelope
//! instead of choices. Streamed chunk shapes live in `volc-ai-streaming`;
//! this module covers the request body and the non-streaming response.

use serde::{Deserialize, Serialize};

use volc_ai_core::{ChatMetadata, TokenUsage, ToolSpec};

/// Default completion endpoint.
pub const DEFAULT_API_URL: &str = "https://ark.cn-beijing.volces.com/v1/chat/completions";

/// Streaming-mode options; required whenever `stream` is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Ask for token usage on the terminal chunk.
    #[serde(default)]
    pub include_usage: bool,
}

/// The outbound request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Target model identifier.
    pub model: String,
    /// Conversation in wire form.
    pub messages: Vec<WireMessage>,
    /// Whether the response is streamed as SSE.
    pub stream: bool,
    /// Streaming options; present exactly when `stream` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling mass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Generation length limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Return token log probabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    /// Top alternatives per token position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,
    /// Tool-choice directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    /// Opaque request metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChatMetadata>,
}

/// A role/content pair in wire form.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    /// Fixed wire role string.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

/// A tool declaration in the OpenAI function envelope.
#[derive(Debug, Clone, Serialize)]
pub struct WireTool {
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// The tool itself.
    pub function: ToolSpec,
}

impl WireTool {
    /// Wrap a tool spec in the function envelope.
    pub fn function(spec: ToolSpec) -> Self {
        Self {
            kind: "function",
            function: spec,
        }
    }
}

/// The non-streaming response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    /// Provider-assigned completion id.
    pub id: Option<String>,
    /// Model that produced the completion.
    pub model: Option<String>,
    /// Completion candidates; exactly one for this client's requests.
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
    /// Token accounting.
    pub usage: Option<TokenUsage>,
    /// Provider error code; non-empty means the body is an error.
    pub code: Option<String>,
    /// Provider error message accompanying `code`.
    pub message: Option<String>,
}

impl ChatCompletionResponse {
    /// The provider's error code and message, if this body carries one.
    pub fn upstream_error(&self) -> Option<(&str, &str)> {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => {
                Some((code, self.message.as_deref().unwrap_or_default()))
            }
            _ => None,
        }
    }
}

/// One candidate in a non-streaming response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseChoice {
    /// Candidate index.
    #[serde(default)]
    pub index: u32,
    /// The completed message.
    #[serde(default)]
    pub message: ResponseMessage,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// The completed assistant message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    /// Author role.
    pub role: Option<String>,
    /// Full message text.
    pub content: Option<String>,
    /// Requested tool invocations.
    #[serde(default)]
    pub tool_calls: Vec<ResponseToolCall>,
}

/// A completed tool invocation in a non-streaming response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseToolCall {
    /// Provider-assigned call id.
    pub id: Option<String>,
    /// Name and arguments.
    #[serde(default)]
    pub function: ResponseFunction,
}

/// The function half of a completed tool call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseFunction {
    /// Tool name.
    pub name: Option<String>,
    /// JSON-encoded arguments.
    pub arguments: Option<String>,
}

/// Extract a provider error from an arbitrary body.
///
/// Accepts both shapes seen in the wild: the flat `{"code","message"}`
/// envelope and the OpenAI-style `{"error":{"code","message"}}` wrapper.
pub fn parse_error_body(body: &str) -> Option<(String, String)> {
    #[derive(Deserialize)]
    struct Flat {
        code: Option<String>,
        message: Option<String>,
    }

    #[derive(Deserialize)]
    struct Wrapped {
        error: Flat,
    }

    let flat = serde_json::from_str::<Flat>(body)
        .ok()
        .filter(|flat| flat.code.is_some())
        .or_else(|| serde_json::from_str::<Wrapped>(body).ok().map(|w| w.error))?;

    let code = flat.code.filter(|code| !code.is_empty())?;
    Some((code, flat.message.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unset_request_fields_are_omitted() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![WireMessage {
                role: "user",
                content: "hi".to_string(),
            }],
            stream: false,
            stream_options: None,
            temperature: Some(0.0),
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            max_tokens: None,
            stop: None,
            logprobs: None,
            top_logprobs: None,
            tools: None,
            tool_choice: None,
            metadata: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["messages", "model", "stream", "temperature"]);
        assert!(!object.contains_key("top_p"));
        assert!(!object.contains_key("tools"));
    }

    #[test]
    fn tools_serialize_in_the_function_envelope() {
        let tool = WireTool::function(ToolSpec {
            name: "search".to_string(),
            description: "Web search".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        });
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "search");
    }

    #[test]
    fn parse_error_body_accepts_both_shapes() {
        assert_eq!(
            parse_error_body(r#"{"code":"Quota","message":"exceeded"}"#),
            Some(("Quota".to_string(), "exceeded".to_string()))
        );
        assert_eq!(
            parse_error_body(r#"{"error":{"code":"Auth","message":"bad key"}}"#),
            Some(("Auth".to_string(), "bad key".to_string()))
        );
        assert_eq!(parse_error_body("plain text"), None);
        assert_eq!(parse_error_body(r#"{"choices":[]}"#), None);
    }

    #[test]
    fn response_error_envelope_is_detected() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"code":"RateLimit","message":"slow down"}"#).unwrap();
        assert_eq!(response.upstream_error(), Some(("RateLimit", "slow down")));
    }
}
