//! Prompt domain
//!
//! Templates for every model call the orchestrator makes.

pub mod agent;
pub mod ensemble;

pub use agent::AgentPromptTemplate;
pub use ensemble::EnsemblePromptTemplate;
