use serde::Deserialize;

use crate::ProviderId;

/// Price of one model, used to fill in response cost
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Provider serving the model
    pub provider: ProviderId,
    /// Model identifier as echoed in responses
    pub model: String,
    /// Cost per million input tokens
    pub input_per_mtok: f64,
    /// Cost per million output tokens
    pub output_per_mtok: f64,
    /// Currency of both prices
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PricingConfig {
    /// Cost of a call with the given token counts
    pub fn estimate_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let input_cost = f64::from(input_tokens) / 1_000_000.0 * self.input_per_mtok;
        let output_cost = f64::from(output_tokens) / 1_000_000.0 * self.output_per_mtok;
        input_cost + output_cost
    }
}

fn default_currency() -> String {
    "USD".to_owned()
}
