mod harness;

use std::io::Write;
use std::sync::Arc;
use std::thread;

use harness::config::ConfigBuilder;
use harness::fixtures::{hosted_request, valid_request};
use harness::mock_llm::MockLlm;
use indoc::indoc;
use lingua_config::Config;
use lingua_llm::{ProviderId, Translator};
use secrecy::{ExposeSecret, SecretString};
use strum::IntoEnumIterator;

#[test]
fn openai_hosted_request() {
    let translator = Translator::default();
    let request = hosted_request("gpt-4", "k");

    let adapter = translator.registry().get(ProviderId::OpenAi).unwrap();
    assert!(adapter.validate_request(&request).is_ok());

    let payload = translator
        .translate_outbound(&request, ProviderId::OpenAi)
        .unwrap()
        .to_json();

    assert_eq!(payload["model"], "gpt-4");
    assert_eq!(payload["messages"], serde_json::json!([{"role": "user", "content": "hi"}]));
    assert_eq!(payload["temperature"], 0.7);
    assert_eq!(payload["max_tokens"], 1024);
    assert_eq!(payload["frequency_penalty"], 0.0);
    assert_eq!(payload["presence_penalty"], 0.0);
}

#[test]
fn databricks_without_token() {
    let translator = Translator::default();
    let mut request = hosted_request("gpt-4", "");
    request.model.endpoint = Some("https://dbc-1234.cloud.databricks.com".to_owned());

    let err = translator
        .registry()
        .get(ProviderId::Databricks)
        .unwrap()
        .validate_request(&request)
        .unwrap_err();
    assert!(err.mentions("access token"), "{err}");
}

#[test]
fn databricks_collects_every_missing_field() {
    let translator = Translator::default();
    let mut request = hosted_request("", "");
    request.model.kind = None;

    let err = translator
        .translate_outbound(&request, ProviderId::Databricks)
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "Databricks requires a workspace URL (endpoint)".to_owned(),
            "Databricks requires an access token (api_key)".to_owned(),
            "Databricks requires either a serving endpoint name or model path".to_owned(),
        ]
    );
}

#[test]
fn full_cycle_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        indoc! {r#"
            [registry]
            default_provider = "azure"
            enabled = ["azure", "anthropic"]

            [registry.aliases]
            corp = "azure"

            [[pricing]]
            provider = "azure"
            model = "gpt4-deployment"
            input_per_mtok = 10.0
            output_per_mtok = 30.0
        "#}
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    let translator = Arc::new(Translator::from_config(&config));

    let mut request = valid_request(ProviderId::AzureOpenAi);
    request.model.api_key = Some(SecretString::from("azure-key".to_owned()));

    let provider = translator.determine_provider(&request).unwrap();
    assert_eq!(provider, ProviderId::AzureOpenAi);

    let connection = translator.connection_settings(&request, "corp").unwrap();
    assert_eq!(
        connection.url,
        "https://example.openai.azure.com/openai/deployments/gpt4-deployment/chat/completions?api-version=2024-02-01"
    );
    assert_eq!(connection.credential.unwrap().expose_secret(), "azure-key");

    let payload = translator.translate_outbound(&request, provider).unwrap().to_json();
    assert!(payload.get("model").is_none());

    let native = MockLlm::new(provider, "gpt4-deployment").respond(&payload);
    let response = translator.translate_inbound_response(&native, provider);
    assert!(response.success);
    assert_eq!(response.first_text().as_deref(), Some("hi"));
    assert!(response.usage.cost.is_some());

    assert_eq!(translator.registry().list_supported(), vec!["azureopenai", "anthropic"]);
    assert!(translator.translate_outbound(&request, ProviderId::OpenAi).is_err());
}

#[test]
fn translator_is_shared_across_threads() {
    let translator = Arc::new(
        ConfigBuilder::new()
            .with_default_provider(ProviderId::OpenAi)
            .translator(),
    );

    let handles: Vec<_> = ProviderId::iter()
        .map(|provider| {
            let translator = Arc::clone(&translator);
            thread::spawn(move || {
                let request = valid_request(provider);
                let payload = translator.translate_outbound(&request, provider).unwrap().to_json();
                let native = MockLlm::new(provider, "mock-model").respond(&payload);
                translator
                    .translate_inbound_response(&native, provider)
                    .first_text()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().as_deref(), Some("hi"));
    }
}
