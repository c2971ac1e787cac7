use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `${VAR}` placeholders, then deserializes and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the default provider is disabled, an alias is
    /// blank, limits are out of order, or a price is negative
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_registry()?;
        self.validate_limits()?;
        self.validate_pricing()?;
        Ok(())
    }

    fn validate_registry(&self) -> anyhow::Result<()> {
        let registry = &self.registry;

        if let Some(default) = registry.default_provider
            && !registry.is_enabled(default)
        {
            anyhow::bail!("registry.default_provider '{default}' is not in registry.enabled");
        }

        for (alias, target) in &registry.aliases {
            if alias.trim().is_empty() {
                anyhow::bail!("registry.aliases contains a blank alias");
            }
            if !registry.is_enabled(*target) {
                anyhow::bail!("alias '{alias}' points to disabled provider '{target}'");
            }
        }

        Ok(())
    }

    fn validate_limits(&self) -> anyhow::Result<()> {
        let limits = &self.validation;

        if limits.min_temperature < 0.0 || limits.min_temperature > limits.max_temperature {
            anyhow::bail!(
                "validation temperature range [{}, {}] is invalid",
                limits.min_temperature,
                limits.max_temperature
            );
        }

        if limits.max_output_tokens == 0 {
            anyhow::bail!("validation.max_output_tokens must be greater than 0");
        }

        if limits.max_penalty < 0.0 {
            anyhow::bail!("validation.max_penalty must not be negative");
        }

        Ok(())
    }

    fn validate_pricing(&self) -> anyhow::Result<()> {
        for entry in &self.pricing {
            if entry.input_per_mtok < 0.0 || entry.output_per_mtok < 0.0 {
                anyhow::bail!("pricing for {}/{} must not be negative", entry.provider, entry.model);
            }
        }

        Ok(())
    }
}
