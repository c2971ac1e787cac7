//! Provider adapter trait and one stateless implementation per backend

pub mod anthropic;
pub mod azure;
pub mod databricks;
pub mod local;
pub mod openai;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::protocol::anthropic::AnthropicRequest;
use crate::protocol::databricks::DatabricksRequest;
use crate::protocol::local::LocalRequest;
use crate::protocol::openai::OpenAiRequest;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};
use crate::validation::check_message_content;

pub use anthropic::AnthropicAdapter;
pub use azure::AzureOpenAiAdapter;
pub use databricks::DatabricksAdapter;
pub use local::LocalAdapter;
pub use openai::OpenAiAdapter;

/// Capabilities advertised by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderCapabilities {
    /// Provider identifier
    pub provider: ProviderId,
    /// Largest context window across the provider's models
    pub max_context_tokens: u32,
    /// Whether responses can be streamed
    pub streaming: bool,
    /// Whether tool/function declarations are honoured
    pub function_calling: bool,
    /// Whether image input is accepted
    pub vision: bool,
    /// Whether document input is accepted
    pub documents: bool,
    /// Whether a JSON output mode exists
    pub json_mode: bool,
    /// Whether self-hosted or custom models can be served
    pub custom_models: bool,
    /// Known model identifiers
    pub models: &'static [&'static str],
}

/// Where and how the HTTP collaborator should send a translated request
///
/// Header placement of the credential stays with the collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    /// Provider base URL
    pub base_url: String,
    /// Fully built chat endpoint URL
    pub url: String,
    /// Model, deployment or serving endpoint name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API version, for providers that version their API separately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// API key or access token
    #[serde(skip)]
    pub credential: Option<SecretString>,
}

/// Provider-native request payload, ready to be serialized as the HTTP body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NativePayload {
    /// `OpenAI` and Azure chat completion body
    OpenAi(OpenAiRequest),
    /// Anthropic messages body
    Anthropic(AnthropicRequest),
    /// Databricks serving invocation body
    Databricks(DatabricksRequest),
    /// Local server chat body
    Local(LocalRequest),
}

impl NativePayload {
    /// Render the payload as a JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Trait implemented by each provider adapter
///
/// Implementations hold no per-call state; every method is a pure function of
/// its arguments so one instance can serve any number of concurrent calls.
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter speaks for
    fn id(&self) -> ProviderId;

    /// Convert a canonical request into the provider's payload
    ///
    /// Total: restrictions the provider cannot satisfy are reported by
    /// [`ProviderAdapter::validate_request`] beforehand.
    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload;

    /// Convert a provider response, mapping malformed input to a failure value
    fn convert_response(&self, native: &Value) -> CanonicalResponse;

    /// Convert one provider stream chunk, independently of any other chunk
    fn convert_stream_delta(&self, native: &Value) -> StreamDelta;

    /// Check provider-specific requirements, reporting every violation
    fn validate_request(&self, request: &CanonicalRequest) -> Result<(), ValidationError>;

    /// Content part types the provider accepts
    fn supported_content_types(&self) -> &'static [ContentType];

    /// Advertised capabilities
    fn capabilities(&self) -> ProviderCapabilities;

    /// Endpoint, model and credential the request should be sent with
    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings;
}

/// Distinct content types in `request` the provider does not accept, first-seen order
pub fn unsupported_content_types(request: &CanonicalRequest, supported: &[ContentType]) -> Vec<ContentType> {
    let mut found = Vec::new();
    for content_type in request.content_parts().map(crate::types::ContentPart::content_type) {
        if !supported.contains(&content_type) && !found.contains(&content_type) {
            found.push(content_type);
        }
    }
    found
}

/// Checks shared by every adapter, appended to `violations`
fn check_common(
    request: &CanonicalRequest,
    display_name: &str,
    supported: &[ContentType],
    violations: &mut Vec<String>,
) {
    if request.conversation().next().is_none() {
        violations.push(format!("{display_name} requires at least one non-system message"));
    }

    check_message_content(request, violations);

    let unsupported = unsupported_content_types(request, supported);
    if !unsupported.is_empty() {
        let names: Vec<&str> = unsupported.iter().map(AsRef::as_ref).collect();
        violations.push(format!(
            "{display_name} does not support content types: {}",
            names.join(", ")
        ));
    }
}

/// Credential from the model reference, if non-empty
fn credential(request: &CanonicalRequest) -> Option<SecretString> {
    request.model.has_api_key().then(|| request.model.api_key.clone()).flatten()
}

/// Base URL with any trailing slash removed
fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
