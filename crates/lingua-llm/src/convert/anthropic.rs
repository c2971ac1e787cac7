//! Conversion between canonical types and the Anthropic Messages format

use serde::Deserialize;
use serde_json::{Value, json};

use super::{Chunk, decode_chunk, finish_reason, malformed, parse_data_uri};
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicErrorResponse, AnthropicMessage, AnthropicRequest,
    AnthropicResponse, AnthropicResponseBlock, AnthropicSource, AnthropicStreamContentBlock, AnthropicStreamDelta,
    AnthropicStreamEvent, AnthropicUsage,
};
use crate::types::{
    CanonicalRequest, CanonicalResponse, Choice, ContentPart, Message, Role, StreamDelta, UsageMetrics,
};

// -- Outbound: canonical -> Anthropic wire format --

/// Build an Anthropic request body
///
/// System instructions move to the top-level `system` field and system-role
/// messages are dropped from the conversation.
pub fn to_anthropic_request(req: &CanonicalRequest, model: String) -> AnthropicRequest {
    let messages = req
        .conversation()
        .map(|msg| AnthropicMessage {
            role: msg.role.to_string(),
            content: to_anthropic_content(&msg.content),
        })
        .collect();

    let config = &req.config;

    AnthropicRequest {
        model,
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
        stream: config.stream,
        stop_sequences: config.stop.clone(),
        system: req.system_text(),
    }
}

/// Convert canonical parts to blocks, collapsing a lone text part to a string
fn to_anthropic_content(parts: &[ContentPart]) -> AnthropicContent {
    let blocks: Vec<AnthropicContentBlock> = parts
        .iter()
        .filter_map(|part| {
            let payload = part.payload()?;
            match part {
                ContentPart::Text { .. } => Some(AnthropicContentBlock::Text {
                    text: payload.to_owned(),
                }),
                ContentPart::Image { .. } => Some(AnthropicContentBlock::Image {
                    source: to_anthropic_source(payload),
                }),
                ContentPart::Document { .. } => Some(AnthropicContentBlock::Document {
                    source: to_anthropic_source(payload),
                }),
                ContentPart::Url { .. } => None,
            }
        })
        .collect();

    match <[AnthropicContentBlock; 1]>::try_from(blocks) {
        Ok([AnthropicContentBlock::Text { text }]) => AnthropicContent::Text(text),
        Ok([block]) => AnthropicContent::Blocks(vec![block]),
        Err(blocks) if blocks.is_empty() => AnthropicContent::Text(String::new()),
        Err(blocks) => AnthropicContent::Blocks(blocks),
    }
}

/// Data URIs become base64 sources, anything else a URL source
fn to_anthropic_source(reference: &str) -> AnthropicSource {
    match parse_data_uri(reference) {
        Some((media_type, data)) => AnthropicSource::Base64 {
            media_type: media_type.to_owned(),
            data: data.to_owned(),
        },
        None => AnthropicSource::Url {
            url: reference.to_owned(),
        },
    }
}

// -- Inbound: Anthropic wire format -> canonical --

/// Convert an Anthropic messages response
pub fn from_anthropic_response(native: &Value, provider: &str) -> CanonicalResponse {
    if let Some(error) = error_message(native) {
        return CanonicalResponse::failure(provider, error);
    }

    let resp = match AnthropicResponse::deserialize(native) {
        Ok(resp) => resp,
        Err(e) => return CanonicalResponse::failure(provider, malformed(provider, "response", &e)),
    };

    let mut content = Vec::new();
    let mut tool_calls = Vec::new();

    for block in resp.content {
        match block {
            AnthropicResponseBlock::Text { text } => content.push(ContentPart::Text { text: Some(text) }),
            AnthropicResponseBlock::ToolUse { id, name, input } => {
                tool_calls.push(json!({"id": id, "name": name, "input": input}));
            }
            AnthropicResponseBlock::Other => {}
        }
    }

    let choice = Choice {
        index: 0,
        message: Message {
            role: Role::Assistant,
            content,
        },
        finish_reason: finish_reason(resp.stop_reason.as_deref()),
    };

    let mut out = CanonicalResponse::success(provider, vec![choice]);
    out.id = resp.id;
    out.model = resp.model;
    if let Some(usage) = &resp.usage {
        out.usage = from_anthropic_usage(usage);
    }
    if !tool_calls.is_empty() {
        out.metadata.insert("tool_calls".to_owned(), Value::Array(tool_calls));
    }

    out
}

/// Convert one Anthropic server-sent event payload
pub fn from_anthropic_event(native: &Value, provider: &str) -> StreamDelta {
    let native = match decode_chunk(native) {
        Ok(Chunk::Json(value)) => value,
        Ok(Chunk::Done) => return StreamDelta::done(),
        Err(e) => return StreamDelta::failure(e),
    };

    let event = match AnthropicStreamEvent::deserialize(&*native) {
        Ok(event) => event,
        Err(e) => return StreamDelta::failure(malformed(provider, "stream event", &e)),
    };

    match event {
        AnthropicStreamEvent::MessageStart { message } => {
            let mut delta = StreamDelta {
                delta: Some(Message {
                    role: Role::Assistant,
                    content: Vec::new(),
                }),
                usage: message.usage.as_ref().map(from_anthropic_usage),
                ..StreamDelta::empty()
            };
            if let Some(id) = message.id {
                delta.metadata.insert("id".to_owned(), id.into());
            }
            if let Some(model) = message.model {
                delta.metadata.insert("model".to_owned(), model.into());
            }
            delta
        }
        AnthropicStreamEvent::ContentBlockStart { index, content_block } => match content_block {
            AnthropicStreamContentBlock::Text { text } if !text.is_empty() => StreamDelta::text(text),
            AnthropicStreamContentBlock::ToolUse { id, name } => {
                tool_call_delta(json!({"index": index, "id": id, "name": name}))
            }
            AnthropicStreamContentBlock::Text { .. } | AnthropicStreamContentBlock::Other => StreamDelta::empty(),
        },
        AnthropicStreamEvent::ContentBlockDelta { index, delta } => match delta {
            AnthropicStreamDelta::TextDelta { text } => StreamDelta::text(text),
            AnthropicStreamDelta::InputJsonDelta { partial_json } => {
                tool_call_delta(json!({"index": index, "partial_json": partial_json}))
            }
            AnthropicStreamDelta::Other => StreamDelta::empty(),
        },
        AnthropicStreamEvent::MessageDelta { delta, usage } => StreamDelta {
            finish_reason: finish_reason(delta.stop_reason.as_deref()),
            usage: usage.as_ref().map(from_anthropic_usage),
            ..StreamDelta::empty()
        },
        AnthropicStreamEvent::MessageStop => StreamDelta::done(),
        AnthropicStreamEvent::ContentBlockStop { .. } | AnthropicStreamEvent::Ping => StreamDelta::empty(),
        AnthropicStreamEvent::Error { error } => StreamDelta::failure(error.message),
    }
}

/// Message of a `{"type": "error", "error": {...}}` body
fn error_message(native: &Value) -> Option<String> {
    let error = native.get("error").filter(|e| !e.is_null())?;
    match AnthropicErrorResponse::deserialize(native) {
        Ok(body) => Some(body.error.message),
        Err(_) => Some(error.as_str().map_or_else(|| error.to_string(), ToOwned::to_owned)),
    }
}

fn from_anthropic_usage(usage: &AnthropicUsage) -> UsageMetrics {
    UsageMetrics::from_counts(usage.input_tokens, usage.output_tokens)
}

fn tool_call_delta(call: Value) -> StreamDelta {
    let mut delta = StreamDelta::empty();
    delta.metadata.insert("tool_calls".to_owned(), Value::Array(vec![call]));
    delta
}
