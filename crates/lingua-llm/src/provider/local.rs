//! Local inference server adapter

use serde_json::Value;

use super::{
    ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities, check_common, credential, trim_base,
};
use crate::convert::local::{from_local_chunk, from_local_response, to_local_request};
use crate::error::ValidationError;
use crate::protocol::local::DEFAULT_SERVER_URL;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};

const SUPPORTED: &[ContentType] = &[ContentType::Text, ContentType::Url, ContentType::Document];

/// Adapter for the local llama.cpp-backed server
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAdapter;

impl ProviderAdapter for LocalAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Local
    }

    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload {
        NativePayload::Local(to_local_request(request))
    }

    fn convert_response(&self, native: &Value) -> CanonicalResponse {
        from_local_response(native, self.id().as_ref())
    }

    fn convert_stream_delta(&self, native: &Value) -> StreamDelta {
        from_local_chunk(native, self.id().as_ref())
    }

    fn validate_request(&self, request: &CanonicalRequest) -> Result<(), ValidationError> {
        let name = self.id().display_name();
        let mut violations = Vec::new();

        if request.model.endpoint().is_none() && request.model.path().is_none() {
            violations.push(format!("{name} requires an endpoint or a model path"));
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
            max_context_tokens: 8_192,
            streaming: true,
            function_calling: false,
            vision: false,
            documents: true,
            json_mode: false,
            custom_models: true,
            models: &[],
        }
    }

    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings {
        let base_url = trim_base(request.model.endpoint().unwrap_or(DEFAULT_SERVER_URL)).to_owned();

        ConnectionSettings {
            url: format!("{base_url}/v1/chat/completions"),
            base_url,
            model: request
                .model
                .path()
                .or_else(|| request.model.name())
                .map(ToOwned::to_owned),
            api_version: None,
            credential: credential(request),
        }
    }
}
