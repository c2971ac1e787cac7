//! Conversion between canonical types and the local inference server

use serde::Deserialize;
use serde_json::{Value, json};

use super::{Chunk, decode_chunk, finish_reason, join_rendered, malformed, role_or_assistant};
use crate::protocol::local::{
    DEFAULT_SERVER_URL, LocalChoice, LocalEnvelope, LocalMessage, LocalPath, LocalRequest, LocalUsage,
};
use crate::types::{
    CanonicalRequest, CanonicalResponse, Choice, ContentPart, Message, Role, StreamDelta, UsageMetrics,
};

// -- Outbound: canonical -> local server wire format --

/// Build a local server request
///
/// Document parts are handed to the retrieval index through `paths` instead
/// of being rendered into the prompt.
pub fn to_local_request(req: &CanonicalRequest) -> LocalRequest {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);

    if let Some(system) = req.system_text() {
        messages.push(LocalMessage {
            role: Role::System.to_string(),
            content: system,
        });
    }

    messages.extend(req.messages.iter().map(|msg| LocalMessage {
        role: msg.role.to_string(),
        content: flatten_content(&msg.content),
    }));

    let mut paths: Vec<String> = Vec::new();
    for part in req.content_parts() {
        if let ContentPart::Document { .. } = part
            && let Some(path) = part.payload()
            && !paths.iter().any(|p| p == path)
        {
            paths.push(path.to_owned());
        }
    }

    let config = &req.config;

    LocalRequest {
        messages,
        url: req.model.endpoint().unwrap_or(DEFAULT_SERVER_URL).to_owned(),
        paths,
        model: req.model.path().or_else(|| req.model.name()).map(ToOwned::to_owned),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        top_p: config.top_p,
        stream: config.stream,
    }
}

fn flatten_content(parts: &[ContentPart]) -> String {
    join_rendered(parts.iter().filter_map(|part| {
        let payload = part.payload()?;
        match part {
            ContentPart::Text { .. } => Some(payload.to_owned()),
            ContentPart::Url { .. } => Some(format!("[URL: {payload}]")),
            ContentPart::Image { .. } | ContentPart::Document { .. } => None,
        }
    }))
}

// -- Inbound: local server wire format -> canonical --

/// Convert a local server response envelope
pub fn from_local_response(native: &Value, provider: &str) -> CanonicalResponse {
    let envelope = match LocalEnvelope::deserialize(native) {
        Ok(envelope) => envelope,
        Err(e) => return CanonicalResponse::failure(provider, malformed(provider, "response", &e)),
    };

    if !envelope.success {
        return CanonicalResponse::failure(provider, failure_message(envelope.error));
    }

    let Some(data) = envelope.response else {
        let error = format!("malformed {provider} response: missing field `response`");
        return CanonicalResponse::failure(provider, error);
    };

    let paths = collect_paths(&data.choices);

    let choices = data
        .choices
        .into_iter()
        .map(|choice| {
            let messages = choice.messages.unwrap_or_default();
            let role = role_or_assistant(messages.first().map(|m| m.role.as_str()));
            let content = messages
                .into_iter()
                .filter(|m| !m.content.is_empty())
                .map(|m| ContentPart::Text { text: Some(m.content) })
                .collect();
            Choice {
                index: choice.index,
                message: Message { role, content },
                finish_reason: finish_reason(choice.finish_reason.as_deref()),
            }
        })
        .collect();

    let mut out = CanonicalResponse::success(provider, choices);
    out.id = data.id;
    if let Some(usage) = &envelope.usage {
        out.usage = from_local_usage(usage);
    }
    if !paths.is_empty() {
        out.metadata.insert("paths".to_owned(), Value::Array(paths));
    }

    out
}

/// Convert one local server stream chunk
pub fn from_local_chunk(native: &Value, provider: &str) -> StreamDelta {
    let native = match decode_chunk(native) {
        Ok(Chunk::Json(value)) => value,
        Ok(Chunk::Done) => return StreamDelta::done(),
        Err(e) => return StreamDelta::failure(e),
    };

    let envelope = match LocalEnvelope::deserialize(&*native) {
        Ok(envelope) => envelope,
        Err(e) => return StreamDelta::failure(malformed(provider, "stream chunk", &e)),
    };

    if !envelope.success {
        return StreamDelta::failure(failure_message(envelope.error));
    }

    let mut delta = StreamDelta::empty();
    delta.usage = envelope.usage.as_ref().map(from_local_usage);

    let Some(data) = envelope.response else {
        return delta;
    };

    let paths = collect_paths(&data.choices);
    if !paths.is_empty() {
        delta.metadata.insert("paths".to_owned(), Value::Array(paths));
    }

    if let Some(choice) = data.choices.into_iter().next() {
        delta.finish_reason = finish_reason(choice.finish_reason.as_deref());
        delta.delta = choice.delta.map(|m| Message {
            role: role_or_assistant(Some(&m.role)),
            content: if m.content.is_empty() {
                Vec::new()
            } else {
                vec![ContentPart::Text { text: Some(m.content) }]
            },
        });
    }

    delta
}

fn failure_message(error: Option<String>) -> String {
    error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "local server reported a failure".to_owned())
}

fn collect_paths(choices: &[LocalChoice]) -> Vec<Value> {
    choices
        .iter()
        .flat_map(|c| c.paths.iter())
        .map(|LocalPath { path, score }| json!({"path": path, "score": score}))
        .collect()
}

fn from_local_usage(usage: &LocalUsage) -> UsageMetrics {
    UsageMetrics::from_counts(usage.prompt_tokens, usage.completion_tokens)
}
