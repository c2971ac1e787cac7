//! Provider-independent request checks
//!
//! These run before the adapter's own `validate_request` and, like it, append
//! every violation instead of stopping at the first.

use lingua_config::ValidationConfig;

use crate::provider::ProviderCapabilities;
use crate::types::CanonicalRequest;

/// Bounds applied to every request regardless of provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    /// Lowest accepted temperature
    pub min_temperature: f64,
    /// Highest accepted temperature
    pub max_temperature: f64,
    /// Highest accepted `max_tokens`
    pub max_output_tokens: u32,
    /// Bound on the absolute value of either penalty
    pub max_penalty: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for ValidationLimits {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            min_temperature: config.min_temperature,
            max_temperature: config.max_temperature,
            max_output_tokens: config.max_output_tokens,
            max_penalty: config.max_penalty,
        }
    }
}

impl ValidationLimits {
    /// Append every generic violation in `request` to `violations`
    pub fn check(&self, request: &CanonicalRequest, violations: &mut Vec<String>) {
        if request.messages.is_empty() {
            violations.push("request must contain at least one message".to_owned());
        }

        check_message_content(request, violations);

        let config = &request.config;

        if !(self.min_temperature..=self.max_temperature).contains(&config.temperature) {
            violations.push(format!(
                "temperature must be between {} and {}",
                self.min_temperature, self.max_temperature
            ));
        }

        if !(0.0..=1.0).contains(&config.top_p) {
            violations.push("top_p must be between 0 and 1".to_owned());
        }

        if config.max_tokens == 0 || config.max_tokens > self.max_output_tokens {
            violations.push(format!("max_tokens must be between 1 and {}", self.max_output_tokens));
        }

        let penalties = [
            ("frequency_penalty", config.frequency_penalty),
            ("presence_penalty", config.presence_penalty),
        ];
        for (name, value) in penalties {
            if let Some(value) = value
                && value.abs() > self.max_penalty
            {
                violations.push(format!(
                    "{name} must be between -{max} and {max}",
                    max = self.max_penalty
                ));
            }
        }
    }
}

/// Append a violation for every message with no usable content part
pub fn check_message_content(request: &CanonicalRequest, violations: &mut Vec<String>) {
    for (i, message) in request.messages.iter().enumerate() {
        if !message.has_content() {
            violations.push(format!("message {i} has no content"));
        }
    }
}

/// Append a violation for every requested feature the provider does not advertise
pub fn check_capabilities(
    request: &CanonicalRequest,
    capabilities: &ProviderCapabilities,
    violations: &mut Vec<String>,
) {
    let name = capabilities.provider.display_name();

    if request.declares_tools() && !capabilities.function_calling {
        violations.push(format!("{name} does not support function calling"));
    }

    if request.config.stream && !capabilities.streaming {
        violations.push(format!("{name} does not support streaming"));
    }

    if request.config.max_tokens > capabilities.max_context_tokens {
        violations.push(format!(
            "max_tokens {} exceeds the {name} context window of {} tokens",
            request.config.max_tokens, capabilities.max_context_tokens
        ));
    }
}
