use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation or a stop sequence
    Stop,
    /// Hit the output token limit
    Length,
    /// Model decided to call a tool
    ToolCalls,
    /// Content was filtered by safety systems
    ContentFilter,
}

impl FinishReason {
    /// Parse any provider's spelling of a finish reason
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stop" | "end_turn" | "stop_sequence" | "eos" => Some(Self::Stop),
            "length" | "max_tokens" => Some(Self::Length),
            "tool_calls" | "tool_use" | "function_call" => Some(Self::ToolCalls),
            "content_filter" | "refusal" => Some(Self::ContentFilter),
            _ => None,
        }
    }
}

/// Token accounting for one call
///
/// Counts a provider did not report stay at zero; the `*_reported` flags
/// tell an unknown count apart from a real zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Prompt tokens
    pub input_tokens: u32,
    /// Generated tokens
    pub output_tokens: u32,
    /// Always `input_tokens + output_tokens`
    pub total_tokens: u32,
    /// Time spent by the provider, when known
    #[serde(default)]
    pub processing_time_ms: u64,
    /// Monetary cost of the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Currency of `cost`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_currency: Option<String>,
    /// Whether the provider reported `input_tokens`
    #[serde(default)]
    pub input_reported: bool,
    /// Whether the provider reported `output_tokens`
    #[serde(default)]
    pub output_reported: bool,
}

impl UsageMetrics {
    /// Build usage from the counts a provider reported
    pub fn from_counts(input: Option<u32>, output: Option<u32>) -> Self {
        let input_tokens = input.unwrap_or(0);
        let output_tokens = output.unwrap_or(0);

        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
            input_reported: input.is_some(),
            output_reported: output.is_some(),
            ..Self::default()
        }
    }

    /// Whether the provider reported any token count
    pub const fn is_reported(&self) -> bool {
        self.input_reported || self.output_reported
    }
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of this choice
    pub index: u32,
    /// Generated assistant message
    pub message: Message,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// Provider-neutral completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    /// Whether the provider produced a usable completion
    pub success: bool,
    /// Failure description, present iff `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Provider response identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage
    #[serde(default)]
    pub usage: UsageMetrics,
    /// Provider-specific extras (tool calls, retrieval paths, ...)
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Provider that produced the response
    pub provider: String,
    /// Model echoed by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// When the response was converted
    pub timestamp: Timestamp,
}

impl CanonicalResponse {
    /// Successful response with the given choices
    pub fn success(provider: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            success: true,
            error: None,
            id: None,
            choices,
            usage: UsageMetrics::default(),
            metadata: serde_json::Map::new(),
            provider: provider.into(),
            model: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Failed response carrying an error description
    pub fn failure(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::success(provider, Vec::new())
        }
    }

    /// Text of the first choice, if any
    pub fn first_text(&self) -> Option<String> {
        self.choices.first().map(|c| c.message.joined_text())
    }
}
