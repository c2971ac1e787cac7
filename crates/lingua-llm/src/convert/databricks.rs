//! Conversion between canonical types and Databricks model serving

use serde::Deserialize;
use serde_json::Value;

use super::openai::{from_openai_chunk, from_openai_response};
use super::{Chunk, decode_chunk, finish_reason, join_rendered, malformed};
use crate::protocol::databricks::{
    DatabricksErrorResponse, DatabricksInputs, DatabricksMessage, DatabricksParameters, DatabricksPrediction,
    DatabricksPredictions, DatabricksRequest,
};
use crate::types::{CanonicalRequest, CanonicalResponse, Choice, ContentPart, Message, Role, StreamDelta};

// -- Outbound: canonical -> Databricks wire format --

/// Build a Databricks invocation body
pub fn to_databricks_request(req: &CanonicalRequest) -> DatabricksRequest {
    let mut messages = Vec::with_capacity(req.messages.len() + 1);

    if let Some(system) = req.system_text() {
        messages.push(DatabricksMessage {
            role: Role::System.to_string(),
            content: system,
        });
    }

    messages.extend(req.messages.iter().map(|msg| DatabricksMessage {
        role: msg.role.to_string(),
        content: flatten_content(&msg.content),
    }));

    let config = &req.config;

    DatabricksRequest {
        inputs: DatabricksInputs { messages },
        parameters: DatabricksParameters {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            stream: config.stream,
        },
    }
}

/// Render every part as text and join them with spaces
fn flatten_content(parts: &[ContentPart]) -> String {
    join_rendered(parts.iter().filter_map(|part| {
        let payload = part.payload()?;
        Some(match part {
            ContentPart::Text { .. } => payload.to_owned(),
            ContentPart::Url { .. } => format!("[Document URL: {payload}]"),
            ContentPart::Document { .. } => format!("[Document: {payload}]"),
            ContentPart::Image { .. } => format!("[Image: {payload}]"),
        })
    }))
}

// -- Inbound: Databricks wire format -> canonical --

/// Convert a serving endpoint response
///
/// Chat endpoints answer in chat-completion shape; custom models answer with
/// `predictions`.
pub fn from_databricks_response(native: &Value, provider: &str) -> CanonicalResponse {
    if let Some(error) = error_message(native) {
        return CanonicalResponse::failure(provider, error);
    }

    if native.get("predictions").is_none() {
        return from_openai_response(native, provider);
    }

    let resp = match DatabricksPredictions::deserialize(native) {
        Ok(resp) => resp,
        Err(e) => return CanonicalResponse::failure(provider, malformed(provider, "response", &e)),
    };

    let choices = resp
        .predictions
        .into_iter()
        .zip(0u32..)
        .map(|(prediction, index)| {
            let (text, reason) = match prediction {
                DatabricksPrediction::Text(text) => (Some(text), None),
                DatabricksPrediction::Candidates { candidates } => candidates
                    .into_iter()
                    .next()
                    .map_or((None, None), |c| (Some(c.text), c.finish_reason)),
            };
            Choice {
                index,
                message: Message {
                    role: Role::Assistant,
                    content: text.map(|t| vec![ContentPart::Text { text: Some(t) }]).unwrap_or_default(),
                },
                finish_reason: finish_reason(reason.as_deref()),
            }
        })
        .collect();

    CanonicalResponse::success(provider, choices)
}

/// Convert one streamed chunk, delivered in chat-completion-chunk shape
pub fn from_databricks_chunk(native: &Value, provider: &str) -> StreamDelta {
    let native = match decode_chunk(native) {
        Ok(Chunk::Json(value)) => value,
        Ok(Chunk::Done) => return StreamDelta::done(),
        Err(e) => return StreamDelta::failure(e),
    };

    if let Some(error) = error_message(&native) {
        return StreamDelta::failure(error);
    }

    from_openai_chunk(&native, provider)
}

/// Message of a `{"error_code": ..., "message": ...}` body
fn error_message(native: &Value) -> Option<String> {
    native.get("error_code")?;
    let body = DatabricksErrorResponse::deserialize(native).ok()?;
    Some(match body.error_code {
        Some(code) => format!("{code}: {}", body.message),
        None => body.message,
    })
}
