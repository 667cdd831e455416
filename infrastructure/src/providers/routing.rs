use super::{AnthropicProvider, OpenAiProvider, ProviderAdapter};
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use marshall_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use marshall_domain::{Model, ProviderKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gateway that forwards each call to the adapter serving the model.
///
/// Resolution order:
///  1. explicit `[providers.routing]` entry for the model name
///  2. the provider family inferred from the model name
///  3. the first configured provider
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    explicit_model_routing: HashMap<String, usize>,
}

impl RoutingGateway {
    pub fn new(
        providers: Vec<Arc<dyn ProviderAdapter>>,
        routing: HashMap<String, ProviderKind>,
    ) -> Self {
        let mut explicit_model_routing = HashMap::new();
        for (model_name, kind) in routing {
            match providers.iter().position(|p| p.kind() == kind) {
                Some(idx) => {
                    explicit_model_routing.insert(model_name, idx);
                }
                None => warn!(
                    "Routing for '{}' targets {}, which is not configured",
                    model_name, kind
                ),
            }
        }

        Self {
            providers,
            explicit_model_routing,
        }
    }

    /// Build every provider that has an API key available.
    pub fn from_config(config: &FileProvidersConfig) -> Self {
        let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
        if let Some(openai) = OpenAiProvider::from_config(&config.openai) {
            providers.push(Arc::new(openai));
        } else {
            debug!("OpenAI provider disabled: no API key");
        }
        if let Some(anthropic) = AnthropicProvider::from_config(&config.anthropic) {
            providers.push(Arc::new(anthropic));
        } else {
            debug!("Anthropic provider disabled: no API key");
        }
        Self::new(providers, config.routing_overrides())
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Kinds of the configured providers, in priority order
    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    fn resolve_provider(&self, model: &Model) -> Result<&dyn ProviderAdapter, GatewayError> {
        if let Some(&idx) = self.explicit_model_routing.get(model.as_str()) {
            return Ok(self.providers[idx].as_ref());
        }

        let inferred = model.provider();
        if let Some(p) = self.providers.iter().find(|p| p.kind() == inferred) {
            return Ok(p.as_ref());
        }

        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!(
                    "no provider configured for {} (set {} credentials)",
                    model, inferred
                ))
            })
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        self.resolve_provider(model)?.generate(model, request).await
    }
}
