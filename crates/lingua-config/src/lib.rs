//! Configuration for Lingua
//!
//! TOML with `${VAR}` environment expansion, deserialized into strongly typed
//! sections and validated once at load time.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod logging;
pub mod pricing;
pub mod provider;
pub mod registry;
pub mod validation;

use serde::Deserialize;

pub use logging::*;
pub use pricing::*;
pub use provider::*;
pub use registry::*;
pub use validation::*;

/// Top-level Lingua configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Adapter registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Generic request limits
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Model prices used to fill in response cost
    #[serde(default)]
    pub pricing: Vec<PricingConfig>,
    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}
