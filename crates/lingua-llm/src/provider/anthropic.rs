//! Anthropic Messages API adapter

use serde_json::Value;

use super::{
    ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities, check_common, credential, trim_base,
};
use crate::convert::anthropic::{from_anthropic_event, from_anthropic_response, to_anthropic_request};
use crate::error::ValidationError;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};

/// Model used when the request names none
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Public API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Value of the `anthropic-version` header
pub const API_VERSION: &str = "2023-06-01";

const SUPPORTED: &[ContentType] = &[ContentType::Text, ContentType::Image, ContentType::Document];

/// Adapter for the Anthropic Messages API
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    fn model(request: &CanonicalRequest) -> String {
        request.model.name().unwrap_or(DEFAULT_MODEL).to_owned()
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload {
        NativePayload::Anthropic(to_anthropic_request(request, Self::model(request)))
    }

    fn convert_response(&self, native: &Value) -> CanonicalResponse {
        from_anthropic_response(native, self.id().as_ref())
    }

    fn convert_stream_delta(&self, native: &Value) -> StreamDelta {
        from_anthropic_event(native, self.id().as_ref())
    }

    fn validate_request(&self, request: &CanonicalRequest) -> Result<(), ValidationError> {
        let name = self.id().display_name();
        let mut violations = Vec::new();

        if !request.model.has_api_key() {
            violations.push(format!("{name} requires an API key"));
        }
        check_common(request, name, SUPPORTED, &mut violations);

        ValidationError::check(self.id().as_ref(), violations)
    }

    fn supported_content_types(&self) -> &'static [ContentType] {
        SUPPORTED
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            provider: self.id(),
            max_context_tokens: 200_000,
            streaming: true,
            function_calling: false,
            vision: true,
            documents: true,
            json_mode: false,
            custom_models: false,
            models: &["claude-3-opus-20240229", "claude-3-sonnet-20240229", "claude-3-haiku-20240307"],
        }
    }

    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings {
        let base_url = trim_base(request.model.endpoint().unwrap_or(DEFAULT_BASE_URL)).to_owned();

        ConnectionSettings {
            url: format!("{base_url}/v1/messages"),
            base_url,
            model: Some(Self::model(request)),
            api_version: Some(API_VERSION.to_owned()),
            credential: credential(request),
        }
    }
}
