//! The Volcengine Ark chat client.

pub mod types;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use volc_ai_core::{ChatMetadata, Completion, FinishReason, GenerationSettings, Message, ToolCall, ToolSpec};
use volc_ai_retries::{with_retry, with_retry_cancellable, RetryConfig, RetryError};
use volc_ai_streaming::{ChatCompletionChunk, DeltaAccumulator, IngestOutcome, Settlement, SseLineDecoder};

use crate::error::{ModelError, ModelResult};
use crate::model::ChatModel;
use self::types::{
    parse_error_body, ChatCompletionRequest, ChatCompletionResponse, StreamOptions, WireMessage,
    WireTool, DEFAULT_API_URL,
};

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "VOLC_API_KEY";
/// Environment variable overriding the endpoint.
pub const ENV_API_URL: &str = "VOLC_API_URL";

const SSE_CONTENT_TYPE: &str = "text/event-stream";

// Volc applies greedy-ish defaults when the caller leaves sampling unset.
const DEFAULT_TEMPERATURE: f64 = 0.0;
const DEFAULT_TOP_P: f64 = 1.0;
const DEFAULT_FREQUENCY_PENALTY: f64 = 0.0;

/// Construction parameters for [`VolcChatModel`].
///
/// Validation happens in [`VolcChatModel::new`], not here, so params can be
/// assembled freely with struct-update syntax.
#[derive(Debug, Clone, Default)]
pub struct VolcChatParams {
    /// Target model identifier; required.
    pub model: String,
    /// API key; required.
    pub api_key: Option<String>,
    /// Endpoint override; defaults to the Ark completion URL.
    pub api_url: Option<String>,
    /// Stream the response as SSE.
    pub streaming: bool,
    /// Required when `streaming` is set.
    pub stream_options: Option<StreamOptions>,
    /// Sampling parameters.
    pub settings: GenerationSettings,
    /// Opaque request metadata.
    pub metadata: Option<ChatMetadata>,
    /// Tools the model may call.
    pub tools: Vec<ToolSpec>,
    /// Tool-choice directive.
    pub tool_choice: Option<String>,
    /// Retry policy for transient transport failures.
    pub retry: Option<RetryConfig>,
}

impl VolcChatParams {
    /// Params for `model` with everything else default.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Params for `model`, with key and endpoint taken from `VOLC_API_KEY`
    /// and `VOLC_API_URL`.
    pub fn from_env(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: std::env::var(ENV_API_KEY).ok(),
            api_url: std::env::var(ENV_API_URL).ok(),
            ..Default::default()
        }
    }
}

/// Chat client for the Volcengine Ark OpenAI-compatible endpoint.
///
/// Holds only configuration; every call builds a fresh decode pipeline, so
/// one instance serves concurrent calls.
#[derive(Debug, Clone)]
pub struct VolcChatModel {
    model: String,
    api_key: String,
    api_url: String,
    streaming: bool,
    stream_options: Option<StreamOptions>,
    settings: GenerationSettings,
    metadata: Option<ChatMetadata>,
    tools: Vec<ToolSpec>,
    tool_choice: Option<String>,
    retry: RetryConfig,
    client: reqwest::Client,
}

impl VolcChatModel {
    /// Validate `params` and build the client.
    ///
    /// Fails with [`ModelError::Configuration`] when the key or model is
    /// missing, or when `streaming` is set without stream options. No network
    /// traffic happens here.
    pub fn new(params: VolcChatParams) -> ModelResult<Self> {
        let api_key = params
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ModelError::configuration(format!(
                    "missing API key: set {ENV_API_KEY} or provide one explicitly"
                ))
            })?;
        if params.model.trim().is_empty() {
            return Err(ModelError::configuration("model name must not be empty"));
        }
        if params.streaming && params.stream_options.is_none() {
            return Err(ModelError::configuration(
                "streaming mode requires stream options",
            ));
        }

        Ok(Self {
            model: params.model,
            api_key,
            api_url: params.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            streaming: params.streaming,
            stream_options: params.stream_options,
            settings: params.settings,
            metadata: params.metadata,
            tools: params.tools,
            tool_choice: params.tool_choice,
            retry: params.retry.unwrap_or_else(RetryConfig::new),
            client: reqwest::Client::new(),
        })
    }

    /// Swap the HTTP client, for connection-pool or TLS configuration.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn build_request(&self, messages: &[Message]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role.wire_name(),
                    content: message.content.clone(),
                })
                .collect(),
            stream: self.streaming,
            stream_options: self.stream_options,
            temperature: self.settings.temperature.or(Some(DEFAULT_TEMPERATURE)),
            top_p: self.settings.top_p.or(Some(DEFAULT_TOP_P)),
            frequency_penalty: self
                .settings
                .frequency_penalty
                .or(Some(DEFAULT_FREQUENCY_PENALTY)),
            presence_penalty: self.settings.presence_penalty,
            max_tokens: self.settings.max_tokens,
            stop: self.settings.stop.clone(),
            logprobs: self.settings.logprobs,
            top_logprobs: self.settings.top_logprobs,
            tools: (!self.tools.is_empty())
                .then(|| self.tools.iter().cloned().map(WireTool::function).collect()),
            tool_choice: self.tool_choice.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// One attempt: POST the request and consume the response.
    async fn attempt(&self, body: &ChatCompletionRequest) -> ModelResult<Completion> {
        let mut request = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json");
        if self.streaming {
            request = request.header(ACCEPT, SSE_CONTENT_TYPE);
        }

        let response = request.json(body).send().await?;
        if self.streaming {
            self.consume_stream(response).await
        } else {
            self.parse_response(response).await
        }
    }

    /// Map a non-streaming body into a completion.
    async fn parse_response(&self, response: reqwest::Response) -> ModelResult<Completion> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(classify_error_body(status, &text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|err| ModelError::protocol(format!("invalid completion body: {err}")))?;
        if let Some((code, message)) = parsed.upstream_error() {
            return Err(ModelError::upstream(code, message));
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::protocol("response contained no choices"))?;

        Ok(Completion {
            id: parsed.id,
            model: parsed.model,
            text: choice.message.content.unwrap_or_default(),
            finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref()),
            tool_calls: choice
                .message
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: call.id.unwrap_or_default(),
                    name: call.function.name.unwrap_or_default(),
                    arguments: call.function.arguments.unwrap_or_default(),
                })
                .collect(),
            usage: parsed.usage,
        })
    }

    /// Drive the SSE decode pipeline over a streaming response body.
    async fn consume_stream(&self, response: reqwest::Response) -> ModelResult<Completion> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(classify_error_body(status, &text));
        }
        if !content_type.starts_with(SSE_CONTENT_TYPE) {
            // Not an event stream: the whole body is one error event.
            let text = response.text().await?;
            return Err(match parse_error_body(&text) {
                Some((code, message)) => ModelError::upstream(code, message),
                None => ModelError::upstream("", text),
            });
        }

        let mut settlement: Settlement<Completion, ModelError> = Settlement::new();
        let mut decoder = SseLineDecoder::new();
        let mut accumulator = DeltaAccumulator::new();
        let mut body = response.bytes_stream();

        'read: while let Some(next) = body.next().await {
            let bytes = match next {
                Ok(bytes) => bytes,
                Err(err) => {
                    settlement.reject(err.into());
                    break;
                }
            };
            let payloads = match decoder.feed(&bytes) {
                Ok(payloads) => payloads,
                Err(err) => {
                    settlement.reject(err.into());
                    break;
                }
            };

            for payload in payloads {
                let chunk: ChatCompletionChunk = match serde_json::from_str(&payload) {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        settlement.reject(ModelError::protocol(format!(
                            "malformed stream chunk: {err}"
                        )));
                        break 'read;
                    }
                };
                if let Some((code, message)) = chunk.upstream_error() {
                    settlement.reject(ModelError::upstream(code, message));
                    break 'read;
                }
                match accumulator.ingest(chunk) {
                    Ok(IngestOutcome::Finished(completion)) => {
                        settlement.resolve(completion);
                        break 'read;
                    }
                    Ok(IngestOutcome::Pending) => {}
                    Err(err) => {
                        settlement.reject(err.into());
                        break 'read;
                    }
                }
            }

            if decoder.is_done() {
                break;
            }
        }

        match settlement.into_outcome() {
            Some(outcome) => outcome,
            // Orderly [DONE] before a finishing chunk: hand back whatever
            // accumulated.
            None if decoder.is_done() => Ok(accumulator.into_partial()),
            None => Err(ModelError::transport(
                "response body ended before the completion finished",
            )),
        }
    }
}

#[async_trait]
impl ChatModel for VolcChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "volc"
    }

    async fn generate(
        &self,
        messages: &[Message],
        cancel: Option<CancellationToken>,
    ) -> ModelResult<Completion> {
        debug!(
            model = %self.model,
            streaming = self.streaming,
            messages = messages.len(),
            "starting generation"
        );
        let body = self.build_request(messages);

        match cancel {
            Some(token) => with_retry_cancellable(&self.retry, &token, || self.attempt(&body))
                .await
                .map_err(|err| match err {
                    RetryError::Cancelled => ModelError::Cancelled,
                    RetryError::Inner(inner) => inner,
                }),
            None => with_retry(&self.retry, || self.attempt(&body)).await,
        }
    }
}

/// Classify a non-2xx body: a parseable provider error is upstream and
/// final, anything else is transport and retryable.
fn classify_error_body(status: reqwest::StatusCode, body: &str) -> ModelError {
    match parse_error_body(body) {
        Some((code, message)) => ModelError::upstream(code, message),
        None => ModelError::transport(format!("HTTP {status}: {body}")),
    }
}
