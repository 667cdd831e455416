//! Application layer for marshall
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EnsembleParams, ExecutionParams};
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    code_executor::{CodeExecutor, ExecutionOutput, ExecutorError},
    embedder::{Embedder, EmbeddingError},
    llm_gateway::{GatewayError, GenerationConfig, GenerationRequest, LlmGateway},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::run_agent::{
    DecisionAgent, RunAgentError, RunAgentOutput, SCRATCHPAD_SEPARATOR,
};
pub use use_cases::run_ensemble::{Ensemble, EnsembleBuilder, RunEnsembleError};
pub use use_cases::select_answer::{Selection, SelectionError, SimilaritySelector};
