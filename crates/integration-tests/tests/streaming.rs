mod harness;

use harness::mock_llm::{MockLlm, parse_sse_data};
use lingua_llm::types::FinishReason;
use lingua_llm::{ProviderId, StreamDelta, Translator};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

/// Feed every SSE data line to the translator, stopping at the end marker
fn replay(translator: &Translator, provider: ProviderId, body: &str) -> Vec<StreamDelta> {
    let mut deltas = Vec::new();
    for data in parse_sse_data(body) {
        let delta = translator.translate_inbound_delta(&Value::String(data), provider);
        let done = delta.done;
        deltas.push(delta);
        if done {
            break;
        }
    }
    deltas
}

fn joined_text(deltas: &[StreamDelta]) -> String {
    deltas.iter().filter_map(StreamDelta::text_fragment).collect()
}

#[test]
fn streamed_fragments_reassemble_for_every_provider() {
    let translator = Translator::default();
    let words = ["Hel", "lo ", "wor", "ld"];

    for provider in ProviderId::iter() {
        let body = MockLlm::new(provider, "mock-model").stream_body(&words);
        let deltas = replay(&translator, provider, &body);

        assert!(deltas.iter().all(|d| d.success), "{provider}: {deltas:?}");
        assert_eq!(joined_text(&deltas), "Hello world", "{provider}");
        assert!(deltas.last().is_some_and(|d| d.done), "{provider} never finished");
        assert!(
            deltas.iter().any(|d| d.finish_reason == Some(FinishReason::Stop)),
            "{provider} reported no finish reason"
        );
    }
}

#[test]
fn usage_arrives_with_the_stream() {
    let translator = Translator::default();

    for provider in ProviderId::iter() {
        let body = MockLlm::new(provider, "mock-model").stream_body(&["a", "b", "c"]);
        let deltas = replay(&translator, provider, &body);

        let output_tokens = deltas
            .iter()
            .filter_map(|d| d.usage.as_ref())
            .filter(|u| u.output_reported)
            .map(|u| u.output_tokens)
            .max();
        assert_eq!(output_tokens, Some(3), "{provider}");
    }
}

#[test]
fn chunks_convert_independently_and_out_of_order() {
    let translator = Translator::default();
    let body = MockLlm::new(ProviderId::OpenAi, "gpt-4").stream_body(&["one", "two"]);
    let mut chunks = parse_sse_data(&body);
    chunks.reverse();

    let fragments: Vec<Option<String>> = chunks
        .into_iter()
        .map(|data| {
            translator
                .translate_inbound_delta(&Value::String(data), ProviderId::OpenAi)
                .text_fragment()
        })
        .collect();

    assert!(fragments.contains(&Some("one".to_owned())));
    assert!(fragments.contains(&Some("two".to_owned())));
}

#[test]
fn one_bad_chunk_does_not_poison_the_stream() {
    let translator = Translator::default();
    let good = json!({"choices": [{"index": 0, "delta": {"content": "fine"}}]});

    let bad = translator.translate_inbound_delta(&Value::String("{not json".to_owned()), ProviderId::OpenAi);
    assert!(!bad.success);
    assert!(bad.error.is_some());

    let next = translator.translate_inbound_delta(&good, ProviderId::OpenAi);
    assert!(next.success);
    assert_eq!(next.text_fragment().as_deref(), Some("fine"));
}

#[test]
fn anthropic_error_event_is_a_failed_delta() {
    let translator = Translator::default();
    let event = json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}});

    let delta = translator.translate_inbound_delta(&event, "claude");
    assert!(!delta.success);
    assert_eq!(delta.error.as_deref(), Some("Overloaded"));
}

#[test]
fn local_stream_carries_retrieval_paths() {
    let translator = Translator::default();
    let body = MockLlm::new(ProviderId::Local, "llama-3-8b").stream_body(&["ok"]);
    let deltas = replay(&translator, ProviderId::Local, &body);

    let paths = deltas
        .iter()
        .find_map(|d| d.metadata.get("paths"))
        .expect("a chunk should carry retrieval paths");
    assert_eq!(paths[0]["path"], "/docs/handbook.pdf");
}

#[test]
fn unresolved_provider_fails_each_chunk() {
    let translator = Translator::default();
    let delta = translator.translate_inbound_delta(&json!({"choices": []}), "mistral");
    assert!(!delta.success);
    assert_eq!(delta.error.as_deref(), Some("unresolved provider: mistral"));
}
