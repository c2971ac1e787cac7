//! Provider identifier resolution
//!
//! The registry is built once at startup and only read afterwards, so shared
//! references can resolve adapters concurrently without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use lingua_config::RegistryConfig;
pub use lingua_config::{BUILTIN_ALIASES, ProviderId};

use crate::provider::{
    AnthropicAdapter, AzureOpenAiAdapter, DatabricksAdapter, LocalAdapter, OpenAiAdapter, ProviderAdapter,
};

/// Builds a fresh adapter instance
pub type AdapterFactory = Box<dyn Fn() -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Maps provider identifiers and aliases to adapters
pub struct AdapterRegistry {
    factories: IndexMap<ProviderId, AdapterFactory>,
    aliases: HashMap<String, ProviderId>,
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("providers", &self.factories.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_builtin_adapters()
    }
}

impl AdapterRegistry {
    /// Registry with no adapters and only the built-in aliases
    pub fn empty() -> Self {
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(alias, id)| ((*alias).to_owned(), *id))
            .collect();

        Self {
            factories: IndexMap::new(),
            aliases,
        }
    }

    /// Registry with every built-in adapter
    pub fn with_builtin_adapters() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Registry restricted to the configured providers, plus configured aliases
    pub fn from_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::empty();

        let order: Vec<ProviderId> = if config.enabled.is_empty() {
            builtin_order().to_vec()
        } else {
            config.enabled.clone()
        };

        for id in order {
            registry.register(id, builtin_factory(id));
        }

        for (alias, id) in &config.aliases {
            registry.register_alias(alias, *id);
        }

        registry
    }

    /// Register (or replace) the factory for a provider
    ///
    /// A replaced provider keeps its original listing position.
    pub fn register(&mut self, id: ProviderId, factory: AdapterFactory) {
        self.factories.insert(id, factory);
    }

    /// Make `alias` resolve to `id`, case-insensitively
    pub fn register_alias(&mut self, alias: &str, id: ProviderId) {
        self.aliases.insert(alias.trim().to_lowercase(), id);
    }

    /// Resolve a provider name or alias to its identifier
    ///
    /// Returns `None` for unknown names and for providers that are known but
    /// not registered.
    pub fn resolve_id(&self, name: &str) -> Option<ProviderId> {
        let name = name.trim();
        let id = name
            .parse::<ProviderId>()
            .ok()
            .or_else(|| self.aliases.get(&name.to_lowercase()).copied())?;

        self.factories.contains_key(&id).then_some(id)
    }

    /// Adapter for a provider name or alias
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.resolve_id(name).and_then(|id| self.get(id))
    }

    /// Adapter for a provider identifier
    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.factories.get(&id).map(|factory| factory())
    }

    /// Registered provider names in registration order
    pub fn list_supported(&self) -> Vec<&'static str> {
        self.factories.keys().map(|id| (*id).into()).collect()
    }

    /// Registered provider identifiers in registration order
    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.factories.keys().copied()
    }

    /// Whether `name` resolves to a registered adapter
    pub fn is_supported(&self, name: &str) -> bool {
        self.resolve_id(name).is_some()
    }
}

/// Registration order of the built-in adapters
const fn builtin_order() -> &'static [ProviderId] {
    &[
        ProviderId::OpenAi,
        ProviderId::Databricks,
        ProviderId::Anthropic,
        ProviderId::AzureOpenAi,
        ProviderId::Local,
    ]
}

/// Factory for a built-in adapter
pub fn builtin_factory(id: ProviderId) -> AdapterFactory {
    match id {
        ProviderId::Local => adapter_factory::<LocalAdapter>(),
        ProviderId::OpenAi => adapter_factory::<OpenAiAdapter>(),
        ProviderId::Anthropic => adapter_factory::<AnthropicAdapter>(),
        ProviderId::AzureOpenAi => adapter_factory::<AzureOpenAiAdapter>(),
        ProviderId::Databricks => adapter_factory::<DatabricksAdapter>(),
    }
}

/// Factory building a default-constructed adapter of type `A`
pub fn adapter_factory<A>() -> AdapterFactory
where
    A: ProviderAdapter + Default + 'static,
{
    Box::new(|| -> Arc<dyn ProviderAdapter> { Arc::new(A::default()) })
}
