use serde::{Deserialize, Serialize};

use super::message::{Message, Role};
use super::response::{FinishReason, UsageMetrics};

/// One choice's fragment within a multi-choice stream chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChoice {
    /// Choice index
    pub index: u32,
    /// Fragment carried for this choice
    pub delta: Message,
    /// Finish reason (present on the final fragment of the choice)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

/// Normalized form of one streamed chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Whether the chunk was understood
    pub success: bool,
    /// Failure description, present iff `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fragment for the first (or only) choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Message>,
    /// Per-choice fragments for multi-choice streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<StreamChoice>>,
    /// Finish reason of the first choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    /// Partial usage, usually only on the terminal chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetrics>,
    /// Provider-specific extras
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Provider signalled the end of the stream
    #[serde(default)]
    pub done: bool,
}

impl StreamDelta {
    /// Successful chunk carrying nothing
    pub fn empty() -> Self {
        Self {
            success: true,
            error: None,
            delta: None,
            choices: None,
            finish_reason: None,
            usage: None,
            metadata: serde_json::Map::new(),
            done: false,
        }
    }

    /// Successful chunk carrying an assistant text fragment
    pub fn text(fragment: impl Into<String>) -> Self {
        Self {
            delta: Some(Message::text(Role::Assistant, fragment)),
            ..Self::empty()
        }
    }

    /// End-of-stream marker
    pub fn done() -> Self {
        Self {
            done: true,
            ..Self::empty()
        }
    }

    /// Chunk that could not be understood
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::empty()
        }
    }

    /// Text carried by the first-choice fragment
    pub fn text_fragment(&self) -> Option<String> {
        self.delta.as_ref().map(Message::joined_text).filter(|t| !t.is_empty())
    }
}
