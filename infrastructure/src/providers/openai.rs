//! OpenAI chat completions adapter

use super::{ProviderAdapter, read_body, transport_error};
use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use marshall_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use marshall_domain::{Model, ProviderKind};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gateway for the OpenAI chat completions endpoint.
///
/// JSON mode sets `response_format: {"type": "json_object"}`.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build from config; `None` when no API key can be resolved.
    pub fn from_config(config: &FileOpenAiConfig) -> Option<Self> {
        config
            .resolve_api_key()
            .map(|key| Self::new(key, config.base_url.clone()))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub(crate) fn build_request(model: &Model, request: &GenerationRequest) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = request.system_prompt() {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.prompt.clone(),
    });

    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens: request.config.max_tokens,
        temperature: request.config.temperature,
        response_format: request
            .config
            .json_mode
            .then_some(ResponseFormat { kind: "json_object" }),
    }
}

fn parse_response(body: &str) -> Result<String, GatewayError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", e, body)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GatewayError::InvalidResponse("no message content".to_string()))
}

#[async_trait]
impl LlmGateway for OpenAiProvider {
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        debug!("OpenAI request: model={} json={}", model, request.config.json_mode);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&build_request(model, request))
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body("OpenAI", response).await?;
        parse_response(&body)
    }
}

impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }
}
