use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::content::ContentPart;
use super::message::{Message, Role, SystemInstructions};

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default output token budget
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default nucleus sampling threshold
pub const DEFAULT_TOP_P: f64 = 0.9;

/// Sampling and runtime parameters
///
/// Every field has a default so a partially specified config is always
/// convertible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Whether the caller wants a streamed response
    #[serde(default = "default_stream")]
    pub stream: bool,
    /// Frequency penalty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Presence penalty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Conversation identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Parent message identifier for threading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
            stream: default_stream(),
            frequency_penalty: None,
            presence_penalty: None,
            stop: None,
            id: None,
            parent_id: None,
        }
    }
}

const fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

const fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

const fn default_top_p() -> f64 {
    DEFAULT_TOP_P
}

const fn default_stream() -> bool {
    true
}

/// Where the model runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelKind {
    /// Weights on the local machine
    Local,
    /// Self-managed remote server
    Remote,
    /// Cloud provider API
    Cloud,
    /// Hosted inference endpoint
    Hosted,
}

/// Reference to the model a request targets
///
/// Which fields are required depends on the provider and is enforced by that
/// provider's adapter only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelReference {
    /// Where the model runs
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ModelKind>,
    /// Local weights location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Model or deployment identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API key or access token
    #[serde(default, alias = "apiKey", skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl ModelReference {
    /// Model name, if set and non-empty
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    /// Weights path, if set and non-empty
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|s| !s.is_empty())
    }

    /// Endpoint, if set and non-empty
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().filter(|s| !s.is_empty())
    }

    /// Provider hint, if set and non-empty
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a non-empty credential is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.expose_secret().is_empty())
    }
}

/// Provider-neutral completion request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalRequest {
    /// Conversation messages, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,
    /// System instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInstructions>,
    /// Sampling and runtime parameters
    #[serde(default)]
    pub config: RequestConfig,
    /// Target model
    #[serde(default)]
    pub model: ModelReference,
    /// Provider hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Function declarations, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<serde_json::Value>>,
    /// Tool declarations, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
}

impl CanonicalRequest {
    /// Messages that are not system messages
    pub fn conversation(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    /// Every content part across all messages
    pub fn content_parts(&self) -> impl Iterator<Item = &ContentPart> {
        self.messages.iter().flat_map(|m| m.content.iter())
    }

    /// System instruction text, if any instruction is usable
    pub fn system_text(&self) -> Option<String> {
        self.system
            .as_ref()
            .filter(|s| !s.is_blank())
            .map(SystemInstructions::combined_text)
    }

    /// Whether any tool or function declarations were supplied
    pub fn declares_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty()) || self.functions.as_ref().is_some_and(|f| !f.is_empty())
    }
}
