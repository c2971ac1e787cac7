//! `OpenAI` chat completions adapter

use serde_json::Value;

use super::{
    ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities, check_common, credential, trim_base,
};
use crate::convert::openai::{from_openai_chunk, from_openai_response, to_openai_request};
use crate::error::ValidationError;
use crate::registry::ProviderId;
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};

/// Model used when the request names none
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Public API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SUPPORTED: &[ContentType] = &[ContentType::Text, ContentType::Image, ContentType::Url];

/// Adapter for the `OpenAI` chat completions API
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    fn model(request: &CanonicalRequest) -> String {
        request.model.name().unwrap_or(DEFAULT_MODEL).to_owned()
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn convert_request(&self, request: &CanonicalRequest) -> NativePayload {
        NativePayload::OpenAi(to_openai_request(request, Some(Self::model(request))))
    }

    fn convert_response(&self, native: &Value) -> CanonicalResponse {
        from_openai_response(native, self.id().as_ref())
    }

    fn convert_stream_delta(&self, native: &Value) -> StreamDelta {
        from_openai_chunk(native, self.id().as_ref())
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
            max_context_tokens: 128_000,
            streaming: true,
            function_calling: true,
            vision: true,
            documents: false,
            json_mode: true,
            custom_models: false,
            models: &["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo", "gpt-4o"],
        }
    }

    fn connection_settings(&self, request: &CanonicalRequest) -> ConnectionSettings {
        let base_url = trim_base(request.model.endpoint().unwrap_or(DEFAULT_BASE_URL)).to_owned();

        ConnectionSettings {
            url: format!("{base_url}/chat/completions"),
            base_url,
            model: Some(Self::model(request)),
            api_version: None,
            credential: credential(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};
    use serde_json::json;

    use super::*;
    use crate::types::{ContentPart, Message, ModelKind, ModelReference, Role};

    fn hosted_request() -> CanonicalRequest {
        CanonicalRequest {
            messages: vec![Message::text(Role::User, "hi")],
            model: ModelReference {
                kind: Some(ModelKind::Hosted),
                name: Some("gpt-4".to_owned()),
                api_key: Some(SecretString::from("k")),
                ..ModelReference::default()
            },
            ..CanonicalRequest::default()
        }
    }

    #[test]
    fn converts_minimal_request() {
        let adapter = OpenAiAdapter;
        let request = hosted_request();
        assert!(adapter.validate_request(&request).is_ok());

        let body = adapter.convert_request(&request).to_json();
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"], json!([{"role": "user", "content": "hi"}]));
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn model_defaults_to_gpt_4() {
        let mut request = hosted_request();
        request.model.name = None;
        let NativePayload::OpenAi(body) = OpenAiAdapter.convert_request(&request) else {
            panic!("expected an OpenAI payload");
        };
        assert_eq!(body.model.as_deref(), Some(DEFAULT_MODEL));
    }

    #[test]
    fn missing_key_and_document_are_both_reported() {
        let mut request = hosted_request();
        request.model.api_key = None;
        request.messages[0].content.push(ContentPart::Document {
            url: Some("report.pdf".to_owned()),
            language: None,
        });

        let err = OpenAiAdapter.validate_request(&request).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.mentions("API key"));
        assert!(err.mentions("document"));
    }

    #[test]
    fn connection_settings_use_custom_endpoint() {
        let mut request = hosted_request();
        request.model.endpoint = Some("http://localhost:11434/v1/".to_owned());
        let settings = OpenAiAdapter.connection_settings(&request);
        assert_eq!(settings.url, "http://localhost:11434/v1/chat/completions");
        assert_eq!(settings.credential.unwrap().expose_secret(), "k");
    }
}
