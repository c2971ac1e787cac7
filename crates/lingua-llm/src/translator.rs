//! Translation facade
//!
//! Resolves an adapter per call and runs validation before conversion. The
//! translator is immutable after construction; share it as `Arc<Translator>`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use lingua_config::{Config, PricingConfig};
use serde_json::Value;

use crate::error::{TranslateError, ValidationError};
use crate::provider::{ConnectionSettings, NativePayload, ProviderAdapter, ProviderCapabilities};
use crate::registry::{AdapterRegistry, ProviderId};
use crate::types::{CanonicalRequest, CanonicalResponse, ContentType, StreamDelta};
use crate::validation::{ValidationLimits, check_capabilities};

/// Provider given either as an identifier or as a name to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRef {
    /// Known identifier
    Id(ProviderId),
    /// Name or alias, resolved case-insensitively
    Name(String),
}

impl From<ProviderId> for ProviderRef {
    fn from(id: ProviderId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ProviderRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ProviderRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Converts canonical requests to provider payloads and provider output back
#[derive(Debug)]
pub struct Translator {
    registry: AdapterRegistry,
    limits: ValidationLimits,
    pricing: HashMap<(ProviderId, String), PricingConfig>,
    default_provider: Option<ProviderId>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(AdapterRegistry::with_builtin_adapters())
    }
}

impl Translator {
    /// Translator over `registry` with default limits and no pricing
    pub fn new(registry: AdapterRegistry) -> Self {
        Self {
            registry,
            limits: ValidationLimits::default(),
            pricing: HashMap::new(),
            default_provider: None,
        }
    }

    /// Translator built from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(AdapterRegistry::from_config(&config.registry))
            .with_limits(ValidationLimits::from(&config.validation))
            .with_pricing(config.pricing.iter().cloned())
            .with_default_provider(config.registry.default_provider)
    }

    /// Replace the generic request limits
    #[must_use]
    pub const fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Add model prices, later entries replacing earlier ones for the same model
    #[must_use]
    pub fn with_pricing(mut self, pricing: impl IntoIterator<Item = PricingConfig>) -> Self {
        for entry in pricing {
            self.pricing.insert((entry.provider, entry.model.clone()), entry);
        }
        self
    }

    /// Provider used when a request names none
    #[must_use]
    pub const fn with_default_provider(mut self, provider: Option<ProviderId>) -> Self {
        self.default_provider = provider;
        self
    }

    /// Underlying adapter registry
    pub const fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Validate `request` against `provider` and convert it
    ///
    /// Generic limits, adapter requirements and capability checks all run;
    /// the error carries every violation found. Nothing is converted unless
    /// validation passes.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedProvider` when no adapter matches `provider`, and
    /// `Validation` when the request is rejected.
    pub fn translate_outbound(
        &self,
        request: &CanonicalRequest,
        provider: impl Into<ProviderRef>,
    ) -> Result<NativePayload, TranslateError> {
        let adapter = self.adapter(provider.into())?;
        let id = adapter.id();

        if let Err(err) = self.validate(request, adapter.as_ref()) {
            tracing::warn!(
                provider = %id,
                violations = ?err.violations,
                "request rejected before translation"
            );
            return Err(err.into());
        }

        let payload = adapter.convert_request(request);
        tracing::debug!(provider = %id, messages = request.messages.len(), "translated outbound request");

        Ok(payload)
    }

    /// Run every validation pass without converting
    ///
    /// # Errors
    ///
    /// Returns `UnresolvedProvider` or `Validation` as
    /// [`Translator::translate_outbound`] does.
    pub fn validate_request(
        &self,
        request: &CanonicalRequest,
        provider: impl Into<ProviderRef>,
    ) -> Result<(), TranslateError> {
        let adapter = self.adapter(provider.into())?;
        Ok(self.validate(request, adapter.as_ref())?)
    }

    /// Convert a provider response
    ///
    /// Never fails: malformed input and unresolved providers become a
    /// canonical failure response.
    pub fn translate_inbound_response(&self, native: &Value, provider: impl Into<ProviderRef>) -> CanonicalResponse {
        let provider = provider.into();
        let Some(adapter) = self.lookup(&provider) else {
            tracing::warn!(provider = %provider, "cannot convert response for unresolved provider");
            return CanonicalResponse::failure(provider.to_string(), unresolved(&provider));
        };
        let id = adapter.id();

        let mut response = adapter.convert_response(native);

        if response.success {
            self.apply_pricing(id, &mut response);
            tracing::debug!(
                provider = %id,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "translated inbound response"
            );
        } else {
            tracing::warn!(
                provider = %id,
                error = response.error.as_deref().unwrap_or_default(),
                "provider response converted to failure"
            );
        }

        response
    }

    /// Convert one provider stream chunk, independently of any other
    pub fn translate_inbound_delta(&self, native: &Value, provider: impl Into<ProviderRef>) -> StreamDelta {
        let provider = provider.into();
        let Some(adapter) = self.lookup(&provider) else {
            tracing::warn!(provider = %provider, "cannot convert stream chunk for unresolved provider");
            return StreamDelta::failure(unresolved(&provider));
        };

        let delta = adapter.convert_stream_delta(native);

        if !delta.success {
            tracing::warn!(
                provider = %adapter.id(),
                error = delta.error.as_deref().unwrap_or_default(),
                "stream chunk converted to failure"
            );
        }

        delta
    }

    /// Provider a request should go to
    ///
    /// The first hint that resolves wins: `request.provider`, then
    /// `model.provider`, then the configured default.
    pub fn determine_provider(&self, request: &CanonicalRequest) -> Option<ProviderId> {
        [request.provider.as_deref(), request.model.provider()]
            .into_iter()
            .flatten()
            .find_map(|hint| self.registry.resolve_id(hint))
            .or_else(|| {
                self.default_provider
                    .filter(|id| self.registry.providers().any(|p| p == *id))
            })
    }

    /// Endpoint, model and credential for sending `request` to `provider`
    pub fn connection_settings(
        &self,
        request: &CanonicalRequest,
        provider: impl Into<ProviderRef>,
    ) -> Option<ConnectionSettings> {
        self.lookup(&provider.into())
            .map(|adapter| adapter.connection_settings(request))
    }

    /// Capabilities advertised by `provider`
    pub fn capabilities(&self, provider: impl Into<ProviderRef>) -> Option<ProviderCapabilities> {
        self.lookup(&provider.into()).map(|adapter| adapter.capabilities())
    }

    /// Content types `provider` accepts
    pub fn supported_content_types(&self, provider: impl Into<ProviderRef>) -> Option<&'static [ContentType]> {
        self.lookup(&provider.into())
            .map(|adapter| adapter.supported_content_types())
    }

    fn lookup(&self, provider: &ProviderRef) -> Option<Arc<dyn ProviderAdapter>> {
        match provider {
            ProviderRef::Id(id) => self.registry.get(*id),
            ProviderRef::Name(name) => self.registry.resolve(name),
        }
    }

    fn adapter(&self, provider: ProviderRef) -> Result<Arc<dyn ProviderAdapter>, TranslateError> {
        self.lookup(&provider).ok_or_else(|| {
            tracing::warn!(provider = %provider, "no adapter registered");
            TranslateError::UnresolvedProvider {
                provider: provider.to_string(),
            }
        })
    }

    fn validate(&self, request: &CanonicalRequest, adapter: &dyn ProviderAdapter) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        self.limits.check(request, &mut violations);
        if let Err(err) = adapter.validate_request(request) {
            violations.extend(err.violations);
        }
        check_capabilities(request, &adapter.capabilities(), &mut violations);

        // The generic and adapter passes share some checks
        let mut seen = HashSet::new();
        violations.retain(|v| seen.insert(v.clone()));

        ValidationError::check(adapter.id().as_ref(), violations)
    }

    fn apply_pricing(&self, id: ProviderId, response: &mut CanonicalResponse) {
        if response.usage.cost.is_some() || !response.usage.is_reported() {
            return;
        }

        let Some(model) = response.model.clone() else {
            return;
        };

        if let Some(pricing) = self.pricing.get(&(id, model)) {
            response.usage.cost = Some(pricing.estimate_cost(response.usage.input_tokens, response.usage.output_tokens));
            response.usage.cost_currency = Some(pricing.currency.clone());
        }
    }
}

fn unresolved(provider: &ProviderRef) -> String {
    format!("unresolved provider: {provider}")
}

#[cfg(test)]
mod tests {
    use std::thread;

    use indoc::indoc;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::types::{Message, ModelReference, Role};

    fn request(name: &str, key: &str) -> CanonicalRequest {
        CanonicalRequest {
            messages: vec![Message::text(Role::User, "hi")],
            model: ModelReference {
                name: Some(name.to_owned()),
                api_key: Some(SecretString::from(key.to_owned())),
                ..ModelReference::default()
            },
            ..CanonicalRequest::default()
        }
    }

    #[test]
    fn outbound_converts_valid_request() {
        let translator = Translator::default();
        let payload = translator
            .translate_outbound(&request("gpt-4", "k"), ProviderId::OpenAi)
            .unwrap()
            .to_json();
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["messages"][0]["content"], "hi");
    }

    #[test]
    fn outbound_collects_every_pass() {
        let translator = Translator::default();
        let mut request = request("claude-3-haiku-20240307", "");
        request.config.temperature = 5.0;
        request.tools = Some(vec![json!({"name": "lookup"})]);

        let err = translator.translate_outbound(&request, "claude").unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "temperature must be between 0 and 2".to_owned(),
                "Anthropic requires an API key".to_owned(),
                "Anthropic does not support function calling".to_owned(),
            ]
        );
    }

    #[test]
    fn outbound_unknown_provider() {
        let err = Translator::default()
            .translate_outbound(&request("x", "k"), "gemini")
            .unwrap_err();
        assert_eq!(
            err,
            TranslateError::UnresolvedProvider {
                provider: "gemini".to_owned()
            }
        );
    }

    #[test]
    fn inbound_unknown_provider_is_a_failure_value() {
        let translator = Translator::default();

        let response = translator.translate_inbound_response(&json!({}), "gemini");
        assert!(!response.success);
        assert!(response.error.unwrap().contains("gemini"));

        let delta = translator.translate_inbound_delta(&json!({}), "gemini");
        assert!(!delta.success);
        assert!(delta.error.unwrap().contains("gemini"));
    }

    #[test]
    fn pricing_fills_cost_for_known_model() {
        let translator = Translator::default().with_pricing([PricingConfig {
            provider: ProviderId::OpenAi,
            model: "gpt-4o".to_owned(),
            input_per_mtok: 2.5,
            output_per_mtok: 10.0,
            currency: "USD".to_owned(),
        }]);

        let native = json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1_000_000, "completion_tokens": 100_000, "total_tokens": 1_100_000}
        });
        let response = translator.translate_inbound_response(&native, ProviderId::OpenAi);
        assert!((response.usage.cost.unwrap() - 3.5).abs() < 1e-9);
        assert_eq!(response.usage.cost_currency.as_deref(), Some("USD"));

        let mut unpriced = native;
        unpriced["model"] = json!("gpt-3.5-turbo");
        let response = translator.translate_inbound_response(&unpriced, ProviderId::OpenAi);
        assert!(response.usage.cost.is_none());
    }

    #[test]
    fn provider_hints_in_priority_order() {
        let config = Config::parse(indoc! {r#"
            [registry]
            default_provider = "local"
        "#})
        .unwrap();
        let translator = Translator::from_config(&config);

        let mut request = request("gpt-4", "k");
        assert_eq!(translator.determine_provider(&request), Some(ProviderId::Local));

        request.model.provider = Some("Azure".to_owned());
        assert_eq!(translator.determine_provider(&request), Some(ProviderId::AzureOpenAi));

        request.provider = Some("gemini".to_owned());
        assert_eq!(translator.determine_provider(&request), Some(ProviderId::AzureOpenAi));

        request.provider = Some("anthropic".to_owned());
        assert_eq!(translator.determine_provider(&request), Some(ProviderId::Anthropic));
    }

    #[test]
    fn no_hint_and_no_default() {
        let translator = Translator::default();
        assert_eq!(translator.determine_provider(&request("gpt-4", "k")), None);
    }

    #[test]
    fn capability_queries() {
        let translator = Translator::default();
        assert_eq!(translator.capabilities("AZURE").unwrap().provider, ProviderId::AzureOpenAi);
        assert!(
            !translator
                .supported_content_types(ProviderId::Databricks)
                .unwrap()
                .contains(&ContentType::Image)
        );
        assert!(translator.capabilities("gemini").is_none());
    }

    #[test]
    fn shared_across_threads() {
        let translator = Arc::new(Translator::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let translator = Arc::clone(&translator);
                thread::spawn(move || {
                    let provider = if i % 2 == 0 { "openai" } else { "anthropic" };
                    let payload = translator
                        .translate_outbound(&request("m", "k"), provider)
                        .unwrap();
                    let delta = translator.translate_inbound_delta(
                        &json!({"choices": [{"index": 0, "delta": {"content": format!("t{i}")}}]}),
                        ProviderId::OpenAi,
                    );
                    (payload.to_json(), delta.text_fragment())
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let (payload, fragment) = handle.join().unwrap();
            assert_eq!(payload["model"], "m");
            assert_eq!(fragment, Some(format!("t{i}")));
        }
    }
}
