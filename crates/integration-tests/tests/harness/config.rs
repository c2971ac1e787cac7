//! Programmatic configuration builder for integration tests

use lingua_config::{Config, PricingConfig, ProviderId, ValidationConfig};
use lingua_llm::Translator;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with every built-in provider enabled
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Restrict the registry to `providers`, in listing order
    pub fn with_enabled(mut self, providers: &[ProviderId]) -> Self {
        self.config.registry.enabled = providers.to_vec();
        self
    }

    /// Provider used when a request names none
    pub fn with_default_provider(mut self, provider: ProviderId) -> Self {
        self.config.registry.default_provider = Some(provider);
        self
    }

    /// Extra alias resolving to `provider`
    pub fn with_alias(mut self, alias: &str, provider: ProviderId) -> Self {
        self.config.registry.aliases.insert(alias.to_owned(), provider);
        self
    }

    /// Price per million input and output tokens for one model
    pub fn with_pricing(mut self, provider: ProviderId, model: &str, input: f64, output: f64) -> Self {
        self.config.pricing.push(PricingConfig {
            provider,
            model: model.to_owned(),
            input_per_mtok: input,
            output_per_mtok: output,
            currency: "USD".to_owned(),
        });
        self
    }

    /// Replace the generic request limits
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.config.validation = validation;
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Config {
        self.config.validate().expect("test config must be valid");
        self.config
    }

    /// Build the config and a translator over it
    pub fn translator(self) -> Translator {
        Translator::from_config(&self.build())
    }
}
