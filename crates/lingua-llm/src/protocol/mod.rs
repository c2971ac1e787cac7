//! Wire format types for provider-specific API protocols
//!
//! Each module contains pure serde structs matching the respective provider's
//! JSON API format. They only appear at the conversion boundary.

pub mod anthropic;
pub mod databricks;
pub mod local;
pub mod openai;
