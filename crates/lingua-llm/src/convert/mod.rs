//! Conversion between canonical types and provider wire formats
//!
//! Each submodule handles one provider protocol. Outbound conversions are
//! total; inbound conversions turn every malformed payload into a failure
//! value instead of an error.

pub mod anthropic;
pub mod databricks;
pub mod local;
pub mod openai;

use std::borrow::Cow;

use serde_json::Value;

use crate::protocol::openai::STREAM_DONE;
use crate::types::{FinishReason, Role};

/// Describe a payload that could not be mapped onto the canonical shape
fn malformed(provider: &str, what: &str, err: &serde_json::Error) -> String {
    format!("malformed {provider} {what}: {err}")
}

/// Parse an optional provider finish reason
fn finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    reason.and_then(FinishReason::parse)
}

/// Parse a provider role, treating anything unknown as the assistant
fn role_or_assistant(role: Option<&str>) -> Role {
    role.and_then(|r| r.parse().ok()).unwrap_or(Role::Assistant)
}

/// Split a `data:` URI into its media type and base64 data
pub(crate) fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime_and_encoding, data) = rest.split_once(',')?;
    let media_type = mime_and_encoding.strip_suffix(";base64").unwrap_or(mime_and_encoding);
    Some((media_type, data))
}

/// A stream chunk after unwrapping string-framed transports
enum Chunk<'a> {
    /// JSON event payload
    Json(Cow<'a, Value>),
    /// End-of-stream sentinel
    Done,
}

/// Decode one native chunk
///
/// Transports that forward server-sent event data verbatim hand over either
/// the `[DONE]` sentinel or a JSON document still in text form.
fn decode_chunk(native: &Value) -> Result<Chunk<'_>, String> {
    let Value::String(raw) = native else {
        return Ok(Chunk::Json(Cow::Borrowed(native)));
    };

    let raw = raw.trim();
    if raw == STREAM_DONE {
        return Ok(Chunk::Done);
    }

    serde_json::from_str(raw)
        .map(|v| Chunk::Json(Cow::Owned(v)))
        .map_err(|e| format!("unparseable stream chunk: {e}"))
}

/// Join flattened part renderings with single spaces, dropping empty ones
fn join_rendered<I>(rendered: I) -> String
where
    I: IntoIterator<Item = String>,
{
    rendered
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
