//! Domain layer for marshall
//!
//! This crate contains the core decision protocol, the result log that
//! carries memory between decisions, and the pure answer-selection math.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Decision Agent
//!
//! An agent receives a [`Task`] and asks a model for a [`Decision`]:
//!
//! - **Answer**: respond directly
//! - **CodeExecute**: run generated code and read back its `result`
//! - **Dispatch**: split the task into sub-tasks handled by sub-agents
//!
//! Every completed decision is appended to the [`ResultLog`], which is
//! rendered back into the model's instructions on later calls.
//!
//! ## Ensemble
//!
//! The same query is sampled N times and reconciled either by
//! embedding-similarity voting ([`similarity`]) or by a refiner model.

pub mod agent;
pub mod context;
pub mod core;
pub mod decision;
pub mod ensemble;
pub mod prompt;
pub mod similarity;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    model_config::AgentModels,
    outcome::{AgentOutcome, OutcomeMessage},
    role::AgentRole,
    state::{DecisionNode, DecisionState, StateTransitionError},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use context::{
    instruction_context::{ContextRetention, InstructionContext},
    result_log::{LogEntry, ResultLog, ResultLogParseError},
};
pub use core::{error::DomainError, model::Model, model::ProviderKind, task::Task};
pub use decision::{
    entities::{Decision, DecisionKind},
    parsing::{DecisionParseError, parse_decision},
};
pub use ensemble::{
    result::{CandidateScore, EnsembleResult},
    strategy::ReconcileStrategy,
};
pub use prompt::{AgentPromptTemplate, EnsemblePromptTemplate};
pub use similarity::{Embedding, centrality_scores, euclidean_distance, most_central};
pub use tool::{ToolDefinition, Toolkit};
