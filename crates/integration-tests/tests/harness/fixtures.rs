//! Canonical request fixtures

use lingua_llm::types::ModelKind;
use lingua_llm::{CanonicalRequest, ContentPart, Message, ModelReference, ProviderId, Role, SystemInstructions};
use secrecy::SecretString;

/// Single-part user text message
pub fn user_text(text: &str) -> Message {
    Message::text(Role::User, text)
}

/// The hosted-model request used throughout: one user message saying "hi"
pub fn hosted_request(name: &str, api_key: &str) -> CanonicalRequest {
    CanonicalRequest {
        messages: vec![user_text("hi")],
        model: ModelReference {
            kind: Some(ModelKind::Hosted),
            name: Some(name.to_owned()),
            api_key: Some(SecretString::from(api_key.to_owned())),
            ..ModelReference::default()
        },
        ..CanonicalRequest::default()
    }
}

/// Request satisfying every requirement of `provider`
pub fn valid_request(provider: ProviderId) -> CanonicalRequest {
    let mut request = hosted_request(model_for(provider), "test-key");

    match provider {
        ProviderId::AzureOpenAi => {
            request.model.endpoint = Some("https://example.openai.azure.com".to_owned());
        }
        ProviderId::Databricks => {
            request.model.endpoint = Some("https://dbc-1234.cloud.databricks.com".to_owned());
        }
        ProviderId::Local => {
            request.model.kind = Some(ModelKind::Local);
            request.model.api_key = None;
            request.model.endpoint = Some("http://localhost:8000".to_owned());
        }
        ProviderId::OpenAi | ProviderId::Anthropic => {}
    }

    request
}

/// Representative model name for `provider`
pub const fn model_for(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAi => "gpt-4",
        ProviderId::AzureOpenAi => "gpt4-deployment",
        ProviderId::Anthropic => "claude-3-haiku-20240307",
        ProviderId::Databricks => "databricks-meta-llama-3-70b-instruct",
        ProviderId::Local => "llama-3-8b",
    }
}

/// Same request with system instructions
pub fn with_system(mut request: CanonicalRequest, text: &str) -> CanonicalRequest {
    request.system = Some(SystemInstructions::text(text));
    request
}

/// Same request with an image appended to the first message
pub fn with_image(mut request: CanonicalRequest, url: &str) -> CanonicalRequest {
    if let Some(message) = request.messages.first_mut() {
        message
            .content
            .push(ContentPart::image(url).expect("image url must be non-empty"));
    }
    request
}

/// Same request with a document appended to the first message
pub fn with_document(mut request: CanonicalRequest, url: &str) -> CanonicalRequest {
    if let Some(message) = request.messages.first_mut() {
        message
            .content
            .push(ContentPart::document(url, None).expect("document url must be non-empty"));
    }
    request
}

/// Same request with a URL reference appended to the first message
pub fn with_reference(mut request: CanonicalRequest, url: &str) -> CanonicalRequest {
    if let Some(message) = request.messages.first_mut() {
        message
            .content
            .push(ContentPart::reference(url, None).expect("reference url must be non-empty"));
    }
    request
}
