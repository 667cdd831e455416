//! Embedding client for the OpenAI embeddings endpoint.

use crate::config::FileOpenAiConfig;
use async_trait::async_trait;
use marshall_application::ports::embedder::{Embedder, EmbeddingError};
use marshall_domain::{Embedding, Model};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Embeds single texts with a fixed embedding model.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    base_url: String,
    model: Model,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: Model) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
        }
    }

    /// Build from the OpenAI provider config.
    pub fn from_config(config: &FileOpenAiConfig, model: Model) -> Result<Self, EmbeddingError> {
        let key = config
            .resolve_api_key()
            .ok_or(EmbeddingError::MissingApiKey)?;
        if !model.is_embedding() {
            tracing::warn!("{} does not look like an embedding model", model);
        }
        Ok(Self::new(key, config.base_url.clone(), model))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

fn parse_response(body: &str) -> Result<Embedding, EmbeddingError> {
    let response: EmbeddingResponse = serde_json::from_str(body).map_err(|e| {
        EmbeddingError::RequestFailed(format!(
            "Failed to parse embedding response: {} - {}",
            e, body
        ))
    })?;

    let mut data = response.data;
    data.sort_by_key(|d| d.index);
    data.into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|e| !e.is_empty())
        .ok_or(EmbeddingError::EmptyResponse)
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let request = EmbeddingRequest {
            model: self.model.as_str(),
            input: vec![text],
        };

        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Embedding API error: {} - {}", status, body);
            return Err(EmbeddingError::RequestFailed(format!(
                "Embedding API error: {} - {}",
                status, body
            )));
        }

        parse_response(&body)
    }
}
