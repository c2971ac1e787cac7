//! Canonical types for provider-neutral request/response representation
//!
//! Every adapter converts to and from these types. Instances are immutable
//! values built for one call and dropped after conversion.

pub mod content;
pub mod message;
pub mod request;
pub mod response;
pub mod stream;

pub use content::{ContentPart, ContentType};
pub use message::{Message, Role, SystemInstructions};
pub use request::{CanonicalRequest, ModelKind, ModelReference, RequestConfig};
pub use response::{CanonicalResponse, Choice, FinishReason, UsageMetrics};
pub use stream::{StreamChoice, StreamDelta};
