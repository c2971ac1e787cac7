//! Conversion between canonical types and the `OpenAI` chat completion format

use serde::Deserialize;
use serde_json::Value;

use super::{Chunk, decode_chunk, finish_reason, malformed, role_or_assistant};
use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiErrorResponse, OpenAiImageUrl, OpenAiMessage, OpenAiRequest,
    OpenAiResponse, OpenAiStreamChunk, OpenAiStreamOptions, OpenAiUsage,
};
use crate::types::{
    CanonicalRequest, CanonicalResponse, Choice, ContentPart, Message, Role, StreamChoice, StreamDelta, UsageMetrics,
};

// -- Outbound: canonical -> OpenAI wire format --

/// Build an `OpenAI` request body
///
/// `model` is `None` for Azure deployments, which carry the model in the URL.
pub fn to_openai_request(req: &CanonicalRequest, model: Option<String>) -> OpenAiRequest {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);

    if let Some(system) = req.system_text() {
        messages.push(OpenAiMessage {
            role: Role::System.to_string(),
            content: OpenAiContent::Text(system),
        });
    }

    messages.extend(req.messages.iter().map(|msg| OpenAiMessage {
        role: msg.role.to_string(),
        content: to_openai_content(&msg.content),
    }));

    let config = &req.config;

    OpenAiRequest {
        model,
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        top_p: config.top_p,
        stream: config.stream,
        frequency_penalty: config.frequency_penalty.unwrap_or(0.0),
        presence_penalty: config.presence_penalty.unwrap_or(0.0),
        stop: config.stop.clone(),
        tools: req.tools.clone(),
        functions: req.functions.clone(),
        stream_options: config.stream.then_some(OpenAiStreamOptions { include_usage: true }),
    }
}

/// Convert canonical content parts, collapsing a lone text part to a string
fn to_openai_content(parts: &[ContentPart]) -> OpenAiContent {
    let converted: Vec<OpenAiContentPart> = parts
        .iter()
        .filter_map(|part| {
            let payload = part.payload()?.to_owned();
            match part {
                ContentPart::Text { .. } => Some(OpenAiContentPart::Text { text: payload }),
                ContentPart::Image { .. } | ContentPart::Url { .. } => Some(OpenAiContentPart::ImageUrl {
                    image_url: OpenAiImageUrl { url: payload },
                }),
                ContentPart::Document { .. } => None,
            }
        })
        .collect();

    match <[OpenAiContentPart; 1]>::try_from(converted) {
        Ok([OpenAiContentPart::Text { text }]) => OpenAiContent::Text(text),
        Ok([part]) => OpenAiContent::Parts(vec![part]),
        Err(parts) if parts.is_empty() => OpenAiContent::Text(String::new()),
        Err(parts) => OpenAiContent::Parts(parts),
    }
}

// -- Inbound: OpenAI wire format -> canonical --

/// Convert an `OpenAI` chat completion response
pub fn from_openai_response(native: &Value, provider: &str) -> CanonicalResponse {
    if let Some(error) = error_message(native) {
        return CanonicalResponse::failure(provider, error);
    }

    let resp = match OpenAiResponse::deserialize(native) {
        Ok(resp) => resp,
        Err(e) => return CanonicalResponse::failure(provider, malformed(provider, "response", &e)),
    };

    let tool_calls: Vec<Value> = resp
        .choices
        .iter()
        .filter_map(|c| c.message.tool_calls.clone())
        .collect();

    let choices = resp
        .choices
        .into_iter()
        .map(|choice| Choice {
            index: choice.index,
            message: Message {
                role: role_or_assistant(choice.message.role.as_deref()),
                content: choice.message.content.map(from_openai_content).unwrap_or_default(),
            },
            finish_reason: finish_reason(choice.finish_reason.as_deref()),
        })
        .collect();

    let mut out = CanonicalResponse::success(provider, choices);
    out.id = resp.id;
    out.model = resp.model;
    if let Some(usage) = resp.usage {
        out.usage = from_openai_usage(&usage);
    }
    if let Some(created) = resp.created {
        out.metadata.insert("created".to_owned(), created.into());
    }
    insert_tool_calls(&mut out.metadata, tool_calls);

    out
}

/// Convert one `OpenAI` stream chunk
pub fn from_openai_chunk(native: &Value, provider: &str) -> StreamDelta {
    let native = match decode_chunk(native) {
        Ok(Chunk::Json(value)) => value,
        Ok(Chunk::Done) => return StreamDelta::done(),
        Err(e) => return StreamDelta::failure(e),
    };

    if let Some(error) = error_message(&native) {
        return StreamDelta::failure(error);
    }

    let chunk = match OpenAiStreamChunk::deserialize(&*native) {
        Ok(chunk) => chunk,
        Err(e) => return StreamDelta::failure(malformed(provider, "stream chunk", &e)),
    };

    let mut delta = StreamDelta::empty();
    delta.usage = chunk.usage.as_ref().map(from_openai_usage);
    if let Some(id) = chunk.id {
        delta.metadata.insert("id".to_owned(), id.into());
    }

    let tool_calls: Vec<Value> = chunk
        .choices
        .iter()
        .filter_map(|c| c.delta.tool_calls.clone())
        .collect();
    insert_tool_calls(&mut delta.metadata, tool_calls);

    let multi = chunk.choices.len() > 1;
    let choices: Vec<StreamChoice> = chunk
        .choices
        .into_iter()
        .map(|choice| StreamChoice {
            index: choice.index,
            delta: Message {
                role: role_or_assistant(choice.delta.role.as_deref()),
                content: choice
                    .delta
                    .content
                    .filter(|c| !c.is_empty())
                    .map(|text| vec![ContentPart::Text { text: Some(text) }])
                    .unwrap_or_default(),
            },
            finish_reason: finish_reason(choice.finish_reason.as_deref()),
        })
        .collect();

    if let Some(first) = choices.first() {
        delta.delta = Some(first.delta.clone());
        delta.finish_reason = first.finish_reason;
    }
    if multi {
        delta.choices = Some(choices);
    }

    delta
}

/// Message of an `{"error": {...}}` body
fn error_message(native: &Value) -> Option<String> {
    let error = native.get("error").filter(|e| !e.is_null())?;
    match OpenAiErrorResponse::deserialize(native) {
        Ok(body) => Some(body.error.message),
        Err(_) => Some(error.as_str().map_or_else(|| error.to_string(), ToOwned::to_owned)),
    }
}

/// Convert response content, string or parts, into canonical parts
fn from_openai_content(content: OpenAiContent) -> Vec<ContentPart> {
    match content {
        OpenAiContent::Text(text) => vec![ContentPart::Text { text: Some(text) }],
        OpenAiContent::Parts(parts) => parts
            .into_iter()
            .map(|part| match part {
                OpenAiContentPart::Text { text } => ContentPart::Text { text: Some(text) },
                OpenAiContentPart::ImageUrl { image_url } => ContentPart::Image {
                    url: Some(image_url.url),
                },
            })
            .collect(),
    }
}

fn from_openai_usage(usage: &OpenAiUsage) -> UsageMetrics {
    UsageMetrics::from_counts(usage.prompt_tokens, usage.completion_tokens)
}

/// Store tool calls under `metadata["tool_calls"]`, flattening per-choice arrays
fn insert_tool_calls(metadata: &mut serde_json::Map<String, Value>, tool_calls: Vec<Value>) {
    if tool_calls.is_empty() {
        return;
    }

    let flat: Vec<Value> = tool_calls
        .into_iter()
        .flat_map(|calls| match calls {
            Value::Array(items) => items,
            other => vec![other],
        })
        .collect();
    metadata.insert("tool_calls".to_owned(), Value::Array(flat));
}
