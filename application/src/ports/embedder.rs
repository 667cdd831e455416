//! Embedder port

use async_trait::async_trait;
use marshall_domain::Embedding;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),

    #[error("Embedding response was empty")]
    EmptyResponse,

    #[error("Missing API key for embeddings")]
    MissingApiKey,
}

/// Turns text into a fixed-length vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}
