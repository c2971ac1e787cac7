//! Databricks model serving wire format
//!
//! Requests nest the conversation under `inputs` and sampling under
//! `parameters`. Chat-style serving endpoints answer in the `OpenAI` chat
//! completion shape (see [`super::openai`]); older custom models answer with
//! `predictions`.

use serde::{Deserialize, Serialize};

// -- Request types --

/// Databricks serving endpoint invocation body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabricksRequest {
    /// Model inputs
    pub inputs: DatabricksInputs,
    /// Sampling parameters
    pub parameters: DatabricksParameters,
}

/// Conversation inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabricksInputs {
    /// Flattened messages
    pub messages: Vec<DatabricksMessage>,
}

/// Message with content flattened to one string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabricksMessage {
    /// Message role
    pub role: String,
    /// Joined text content
    pub content: String,
}

/// Sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabricksParameters {
    /// Sampling temperature
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Whether to stream the response
    pub stream: bool,
}

// -- Response types --

/// Legacy `predictions` response of custom serving endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabricksPredictions {
    /// One prediction per input row
    pub predictions: Vec<DatabricksPrediction>,
}

/// A single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatabricksPrediction {
    /// Bare generated text
    Text(String),
    /// Candidate list
    Candidates {
        /// Generated candidates
        candidates: Vec<DatabricksCandidate>,
    },
}

/// Candidate within a prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabricksCandidate {
    /// Generated text
    pub text: String,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

// -- Error response --

/// Databricks REST error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabricksErrorResponse {
    /// Error code (e.g. `INVALID_PARAMETER_VALUE`)
    #[serde(default)]
    pub error_code: Option<String>,
    /// Error message
    pub message: String,
}
