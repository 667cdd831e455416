//! Infrastructure layer for marshall
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: vendor LLM gateways, the embedding client,
//! the Python code executor, the JSONL transcript logger, and
//! configuration file loading.

pub mod config;
pub mod embedder;
pub mod executor;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAgentConfig, FileConfig, FileEnsembleConfig, FileExecutorConfig,
    FileLoggingConfig, FileModelsConfig, FileProvidersConfig, FileToolConfig,
};
pub use embedder::OpenAiEmbedder;
pub use executor::PythonExecutor;
pub use logging::JsonlRunLogger;
pub use providers::{AnthropicProvider, OpenAiProvider, ProviderAdapter, RoutingGateway};
pub use tools::{ToolLoadError, load_toolkit};
