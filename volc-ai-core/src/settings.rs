//! Sampling settings and request metadata.

use serde::{Deserialize, Serialize};

/// Optional sampling parameters for a generation request.
///
/// Every field is optional; unset fields are omitted from the wire body and
/// the provider (or the client's own defaults) decide the effective value.
///
/// # Example
///
/// ```
/// use volc_ai_core::GenerationSettings;
///
/// let settings = GenerationSettings::new()
///     .temperature(0.7)
///     .top_p(0.9)
///     .max_tokens(1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Sampling temperature, typically in `[0.0, 2.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling probability mass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Sequences at which generation stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// Penalize tokens by their frequency so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Penalize tokens that already appeared at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Return log probabilities for output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,

    /// Number of most-likely tokens to return per position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
}

impl GenerationSettings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    /// Set the nucleus sampling mass.
    pub fn top_p(mut self, value: f64) -> Self {
        self.top_p = Some(value);
        self
    }

    /// Set the generation length limit.
    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }

    /// Set the stop sequences.
    pub fn stop(mut self, sequences: Vec<String>) -> Self {
        self.stop = Some(sequences);
        self
    }

    /// Set the frequency penalty.
    pub fn frequency_penalty(mut self, value: f64) -> Self {
        self.frequency_penalty = Some(value);
        self
    }

    /// Set the presence penalty.
    pub fn presence_penalty(mut self, value: f64) -> Self {
        self.presence_penalty = Some(value);
        self
    }

    /// Request token log probabilities.
    pub fn logprobs(mut self, value: bool) -> Self {
        self.logprobs = Some(value);
        self
    }

    /// Set how many top alternatives to return per token.
    pub fn top_logprobs(mut self, value: u32) -> Self {
        self.top_logprobs = Some(value);
        self
    }
}

/// Opaque per-request metadata forwarded verbatim on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMetadata {
    /// Caller identity attached to the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<serde_json::Value>,

    /// Provider hint controlling intention-signal side channel output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_intention_signal_extra: Option<serde_json::Value>,

    /// Any further provider-specific keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChatMetadata {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.user_info.is_none() && self.emit_intention_signal_extra.is_none() && self.extra.is_empty()
    }
}
