//! Mock LLM backends for integration tests
//!
//! Turns translated request payloads into the native responses and stream
//! bodies each provider would send back, echoing the last user message.

use lingua_llm::ProviderId;
use serde_json::{Value, json};

/// Default reply when no user text is found in the payload
pub const DEFAULT_REPLY: &str = "Hello from mock LLM";

/// Mock backend that returns predictable responses
pub struct MockLlm {
    provider: ProviderId,
    model: String,
}

impl MockLlm {
    /// Mock for `provider`, echoing `model` in responses
    pub fn new(provider: ProviderId, model: &str) -> Self {
        Self {
            provider,
            model: model.to_owned(),
        }
    }

    /// Native response answering `payload` with its last user message
    pub fn respond(&self, payload: &Value) -> Value {
        let reply = last_user_text(payload).unwrap_or_else(|| DEFAULT_REPLY.to_owned());
        self.response_with(&reply)
    }

    /// Native non-streaming response carrying `content`
    pub fn response_with(&self, content: &str) -> Value {
        match self.provider {
            ProviderId::OpenAi | ProviderId::AzureOpenAi | ProviderId::Databricks => json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion",
                "created": 1_700_000_000,
                "model": self.model,
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            }),
            ProviderId::Anthropic => json!({
                "id": "msg_mock",
                "type": "message",
                "role": "assistant",
                "model": self.model,
                "content": [{"type": "text", "text": content}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 5}
            }),
            ProviderId::Local => json!({
                "success": true,
                "response": {
                    "id": "local-mock",
                    "choices": [{
                        "index": 0,
                        "messages": [{"role": "assistant", "content": content}],
                        "finish_reason": "stop",
                        "paths": []
                    }]
                },
                "usage": {"prompt_tokens": 10, "completion_tokens": 5}
            }),
        }
    }

    /// Native error body
    pub fn error(&self, message: &str) -> Value {
        match self.provider {
            ProviderId::OpenAi | ProviderId::AzureOpenAi => json!({
                "error": {"message": message, "type": "invalid_request_error", "code": null}
            }),
            ProviderId::Anthropic => json!({
                "type": "error",
                "error": {"type": "overloaded_error", "message": message}
            }),
            ProviderId::Databricks => json!({"error_code": "BAD_REQUEST", "message": message}),
            ProviderId::Local => json!({"success": false, "error": message}),
        }
    }

    /// Server-sent event body streaming `words` as separate fragments
    pub fn stream_body(&self, words: &[&str]) -> String {
        let mut body = String::new();

        match self.provider {
            ProviderId::OpenAi | ProviderId::AzureOpenAi | ProviderId::Databricks => {
                push_data(&mut body, &self.openai_chunk(json!({"role": "assistant", "content": ""}), None));
                for word in words {
                    push_data(&mut body, &self.openai_chunk(json!({"content": word}), None));
                }
                push_data(&mut body, &self.openai_chunk(json!({}), Some("stop")));
                push_data(
                    &mut body,
                    &json!({
                        "id": "chatcmpl-mock",
                        "model": self.model,
                        "choices": [],
                        "usage": {"prompt_tokens": 10, "completion_tokens": words.len(), "total_tokens": 10 + words.len()}
                    }),
                );
                body.push_str("data: [DONE]\n\n");
            }
            ProviderId::Anthropic => {
                push_event(
                    &mut body,
                    "message_start",
                    &json!({
                        "type": "message_start",
                        "message": {
                            "id": "msg_mock",
                            "role": "assistant",
                            "model": self.model,
                            "content": [],
                            "usage": {"input_tokens": 10, "output_tokens": 1}
                        }
                    }),
                );
                push_event(
                    &mut body,
                    "content_block_start",
                    &json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
                );
                push_event(&mut body, "ping", &json!({"type": "ping"}));
                for word in words {
                    push_event(
                        &mut body,
                        "content_block_delta",
                        &json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": word}}),
                    );
                }
                push_event(
                    &mut body,
                    "content_block_stop",
                    &json!({"type": "content_block_stop", "index": 0}),
                );
                push_event(
                    &mut body,
                    "message_delta",
                    &json!({
                        "type": "message_delta",
                        "delta": {"stop_reason": "end_turn", "stop_sequence": null},
                        "usage": {"output_tokens": words.len()}
                    }),
                );
                push_event(&mut body, "message_stop", &json!({"type": "message_stop"}));
            }
            ProviderId::Local => {
                for word in words {
                    push_data(
                        &mut body,
                        &json!({
                            "success": true,
                            "response": {
                                "id": "local-mock",
                                "choices": [{"index": 0, "delta": {"role": "assistant", "content": word}, "paths": []}]
                            }
                        }),
                    );
                }
                push_data(
                    &mut body,
                    &json!({
                        "success": true,
                        "response": {
                            "id": "local-mock",
                            "choices": [{
                                "index": 0,
                                "delta": {"role": "assistant", "content": ""},
                                "finish_reason": "stop",
                                "paths": [{"path": "/docs/handbook.pdf", "score": 0.92}]
                            }]
                        },
                        "usage": {"prompt_tokens": 10, "completion_tokens": words.len()}
                    }),
                );
                body.push_str("data: [DONE]\n\n");
            }
        }

        body
    }

    fn openai_chunk(&self, delta: Value, finish_reason: Option<&str>) -> Value {
        json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion.chunk",
            "created": 1_700_000_000,
            "model": self.model,
            "choices": [{"index": 0, "delta": delta, "finish_reason": finish_reason}]
        })
    }
}

/// Text of the last user message in any provider payload
pub fn last_user_text(payload: &Value) -> Option<String> {
    let messages = payload
        .get("messages")
        .or_else(|| payload.pointer("/inputs/messages"))?
        .as_array()?;

    let message = messages.iter().rev().find(|m| m["role"] == "user")?;

    match &message["content"] {
        Value::String(text) => Some(text.clone()),
        Value::Array(blocks) => blocks
            .iter()
            .find_map(|b| b.get("text").and_then(Value::as_str))
            .map(str::to_owned),
        _ => None,
    }
}

/// Parse SSE data lines from a raw stream body
pub fn parse_sse_data(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with("data: "))
        .map(|line| line.trim_start_matches("data: ").to_owned())
        .collect()
}

fn push_data(body: &mut String, chunk: &Value) {
    body.push_str(&format!("data: {chunk}\n\n"));
}

fn push_event(body: &mut String, event: &str, chunk: &Value) {
    body.push_str(&format!("event: {event}\ndata: {chunk}\n\n"));
}
