use indexmap::IndexMap;
use serde::Deserialize;

use crate::ProviderId;

/// Adapter registry configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Provider used when a request names none
    #[serde(default)]
    pub default_provider: Option<ProviderId>,
    /// Providers to register, in listing order (all built-ins when empty)
    #[serde(default)]
    pub enabled: Vec<ProviderId>,
    /// Extra aliases, name to provider
    #[serde(default)]
    pub aliases: IndexMap<String, ProviderId>,
}

impl RegistryConfig {
    /// Whether `provider` should be registered
    pub fn is_enabled(&self, provider: ProviderId) -> bool {
        self.enabled.is_empty() || self.enabled.contains(&provider)
    }
}
