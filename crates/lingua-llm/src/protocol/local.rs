//! Local inference server wire format
//!
//! The local server fronts a llama.cpp process and a retrieval index. Requests
//! carry plain-string messages plus the paths of documents to ground on;
//! responses and stream chunks share one `success`/`response` envelope.

use serde::{Deserialize, Serialize};

/// Default address of the local llama.cpp server
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

// -- Request types --

/// Local server chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRequest {
    /// Conversation messages
    pub messages: Vec<LocalMessage>,
    /// Completion server URL
    pub url: String,
    /// Document paths to ground the answer on
    #[serde(default)]
    pub paths: Vec<String>,
    /// Model weights path or name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Whether to stream the response
    pub stream: bool,
}

/// Message with string content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalMessage {
    /// Message role, omitted on some stream chunks
    #[serde(default)]
    pub role: String,
    /// Joined text content
    #[serde(default)]
    pub content: String,
}

// -- Response types --

/// Envelope shared by full responses and stream chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEnvelope {
    /// Whether the server handled the request
    pub success: bool,
    /// Failure description
    #[serde(default)]
    pub error: Option<String>,
    /// Payload, present on success
    #[serde(default)]
    pub response: Option<LocalResponseData>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<LocalUsage>,
}

/// Response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalResponseData {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<LocalChoice>,
}

/// Choice within a local response or chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Complete messages (full responses)
    #[serde(default)]
    pub messages: Option<Vec<LocalMessage>>,
    /// Incremental message (stream chunks)
    #[serde(default)]
    pub delta: Option<LocalMessage>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Retrieval sources used for the answer
    #[serde(default)]
    pub paths: Vec<LocalPath>,
}

/// Retrieval source with its relevance score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalPath {
    /// Document path
    pub path: String,
    /// Similarity score
    #[serde(default)]
    pub score: Option<f64>,
}

/// Token usage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUsage {
    /// Prompt tokens
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Completion tokens
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}
