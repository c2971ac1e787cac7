//! Azure-hosted `OpenAI` deployments
//!
//! The body is the `OpenAI` one without `model`; the deployment name and API
//! version travel in the URL instead.

use serde_json::Value;
use url::Url;

use super::{
    ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities, check_common, credential, trim_base,
};
use crate::convert::openai::{from_openai_chunk, from_openai_response, to_openai_request};
use crate::error::ValidationError;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};

/// REST API version appended to every deployment URL
pub const API_VERSION: &str = "2024-02-01";

const SUPPORTED: &[ContentType] = &[ContentType::Text, ContentType::Image, ContentType::Url];

/// Adapter for Azure `OpenAI` deployments
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureOpenAiAdapter;

impl ProviderAdapter for AzureOpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::AzureOpenAi
    }

    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload {
        let mut body = to_openai_request(request, None);
        // `stream_options` is unknown to the pinned API version
        body.stream_options = None;
        NativePayload::OpenAi(body)
    }

    fn convert_response(&self, native: &Value) -> CanonicalResponse {
        from_openai_response(native, self.id().as_ref())
    }

    fn convert_stream_delta(&self, native: &Value) -> StreamDelta {
        from_openai_chunk(native, self.id().as_ref())
    }

    fn validate_request(&self, request: &CanonicalRequest) -> Result<(), ValidationError> {
        let name = self.id().display_name();
        let model = &request.model;
        let mut violations = Vec::new();

        if !model.has_api_key() {
            violations.push(format!("{name} requires an API key"));
        }
        match model.endpoint() {
            None => violations.push(format!("{name} requires an endpoint URL")),
            Some(endpoint) => {
                if let Err(e) = Url::parse(endpoint) {
                    violations.push(format!("{name} endpoint `{endpoint}` is not a valid URL: {e}"));
                }
            }
        }
        if model.name().is_none() {
            violations.push(format!("{name} requires a deployment name"));
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
            max_context_tokens: 128_000,
            streaming: true,
            function_calling: true,
            vision: true,
            documents: false,
            json_mode: true,
            custom_models: false,
            models: &["gpt-4", "gpt-4-turbo", "gpt-35-turbo", "gpt-4o"],
        }
    }

    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings {
        let base_url = trim_base(request.model.endpoint().unwrap_or_default()).to_owned();
        let deployment = request.model.name().unwrap_or_default();

        ConnectionSettings {
            url: format!("{base_url}/openai/deployments/{deployment}/chat/completions?api-version={API_VERSION}"),
            base_url,
            model: request.model.name().map(ToOwned::to_owned),
            api_version: Some(API_VERSION.to_owned()),
            credential: credential(request),
        }
    }
}
