//! Databricks model serving adapter

use serde_json::Value;

use super::{
    ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities, check_common, credential, trim_base,
};
use crate::convert::databricks::{from_databricks_chunk, from_databricks_response, to_databricks_request};
use crate::error::ValidationError;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};

const SUPPORTED: &[ContentType] = &[ContentType::Text, ContentType::Document];

/// Adapter for Databricks serving endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabricksAdapter;

impl DatabricksAdapter {
    /// Serving endpoint name, falling back to the model path
    fn serving_endpoint(request: &CanonicalRequest) -> Option<&str> {
        request.model.name().or_else(|| request.model.path())
    }
}

impl ProviderAdapter for DatabricksAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Databricks
    }

    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload {
        NativePayload::Databricks(to_databricks_request(request))
    }

    fn convert_response(&self, native: &Value) -> CanonicalResponse {
        from_databricks_response(native, self.id().as_ref())
    }

    fn convert_stream_delta(&self, native: &Value) -> StreamDelta {
        from_databricks_chunk(native, self.id().as_ref())
    }

    fn validate_request(&self, request: &CanonicalRequest) -> Result<(), ValidationError> {
        let name = self.id().display_name();
        let mut violations = Vec::new();

        if request.model.endpoint().is_none() {
            violations.push(format!("{name} requires a workspace URL (endpoint)"));
        }
        if !request.model.has_api_key() {
            violations.push(format!("{name} requires an access token (api_key)"));
        }
        if Self::serving_endpoint(request).is_none() {
            violations.push(format!("{name} requires either a serving endpoint name or model path"));
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
            max_context_tokens: 32_000,
            streaming: true,
            function_calling: false,
            vision: false,
            documents: true,
            json_mode: false,
            custom_models: true,
            models: &["llama-2-70b-chat", "code-llama-34b", "custom-models"],
        }
    }

    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings {
        let base_url = trim_base(request.model.endpoint().unwrap_or_default()).to_owned();
        let serving_endpoint = Self::serving_endpoint(request);

        ConnectionSettings {
            url: format!(
                "{base_url}/serving-endpoints/{}/invocations",
                serving_endpoint.unwrap_or_default()
            ),
            base_url,
            model: serving_endpoint.map(ToOwned::to_owned),
            api_version: None,
            credential: credential(request),
        }
    }
}
