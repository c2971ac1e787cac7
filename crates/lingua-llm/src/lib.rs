//! Provider-neutral LLM request and response translation
//!
//! Callers build one [`CanonicalRequest`], and a [`Translator`] turns it into
//! the native payload of `OpenAI`, Azure `OpenAI`, Anthropic, Databricks or a
//! local llama.cpp-style server. Responses and stream chunks come back through
//! the same facade as [`CanonicalResponse`] and [`StreamDelta`] values.
//!
//! Everything here is pure and synchronous. Sending payloads over HTTP,
//! placing credentials in headers and sequencing stream chunks belong to the
//! caller.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod registry;
pub mod translator;
pub mod types;
pub mod validation;

pub use error::{ContentError, TranslateError, ValidationError};
pub use provider::{ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities};
pub use registry::{AdapterRegistry, ProviderId};
pub use translator::{ProviderRef, Translator};
pub use types::{
    CanonicalRequest, CanonicalResponse, ContentPart, ContentType, Message, ModelReference, RequestConfig, Role,
    StreamDelta, SystemInstructions, UsageMetrics,
};
pub use validation::ValidationLimits;
