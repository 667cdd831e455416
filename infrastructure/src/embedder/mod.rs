//! Embedding adapters for similarity reconciliation

mod openai;

pub use openai::OpenAiEmbedder;
