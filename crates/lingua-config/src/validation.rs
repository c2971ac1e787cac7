use serde::Deserialize;

/// Generic request limits applied before any provider-specific check
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Lowest accepted temperature
    #[serde(default)]
    pub min_temperature: f64,
    /// Highest accepted temperature
    #[serde(default = "default_max_temperature")]
    pub max_temperature: f64,
    /// Highest accepted output token budget
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Bound on the absolute value of frequency and presence penalties
    #[serde(default = "default_max_penalty")]
    pub max_penalty: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_temperature: 0.0,
            max_temperature: default_max_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_penalty: default_max_penalty(),
        }
    }
}

const fn default_max_temperature() -> f64 {
    2.0
}

const fn default_max_output_tokens() -> u32 {
    32_000
}

const fn default_max_penalty() -> f64 {
    2.0
}
