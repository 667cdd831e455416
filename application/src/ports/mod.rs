//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_progress;
pub mod code_executor;
pub mod embedder;
pub mod llm_gateway;
pub mod run_logger;
