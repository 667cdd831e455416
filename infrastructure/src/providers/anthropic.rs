//! Anthropic messages API adapter

use super::{ProviderAdapter, read_body, transport_error};
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use marshall_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use marshall_domain::{Model, ProviderKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Assistant prefill that forces a JSON object reply
const JSON_PREFILL: &str = "{";

/// Gateway for the Anthropic messages endpoint.
///
/// The API has no JSON mode, so JSON requests prefill the assistant turn
/// with `{` and the prefill is put back in front of the reply.
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    api_version: String,
}

impl AnthropicProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        }
    }

    /// Build from config; `None` when no API key can be resolved.
    pub fn from_config(config: &FileAnthropicConfig) -> Option<Self> {
        config.resolve_api_key().map(|key| {
            Self::new(key, config.base_url.clone(), config.api_version.clone())
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn build_request(model: &Model, request: &GenerationRequest) -> MessagesRequest {
    let mut messages = vec![Message {
        role: "user",
        content: request.prompt.clone(),
    }];
    if request.config.json_mode {
        messages.push(Message {
            role: "assistant",
            content: JSON_PREFILL.to_string(),
        });
    }

    MessagesRequest {
        model: model.to_string(),
        max_tokens: request.config.max_tokens,
        system: request.system_prompt(),
        messages,
        temperature: request.config.temperature,
    }
}

fn parse_response(body: &str, json_mode: bool) -> Result<String, GatewayError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, body)))?;

    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();

    if json_mode {
        Ok(format!("{}{}", JSON_PREFILL, text))
    } else {
        Ok(text)
    }
}

#[async_trait]
impl LlmGateway for AnthropicProvider {
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        debug!(
            "Anthropic request: model={} json={}",
            model, request.config.json_mode
        );
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&build_request(model, request))
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body("Anthropic", response).await?;
        parse_response(&body, request.config.json_mode)
    }
}

impl ProviderAdapter for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }
}
