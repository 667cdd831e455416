//! Type definitions for the RunAgent use case.

use crate::ports::code_executor::ExecutorError;
use crate::ports::llm_gateway::GatewayError;
use marshall_domain::{DecisionNode, DecisionParseError, ResultLog, StateTransitionError, Task};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a decision agent run
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Malformed decision: {0}")]
    MalformedDecision(#[from] DecisionParseError),

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("Code execution failed: {0}")]
    CodeExecution(ExecutorError),

    #[error("Model chose code_execute but no code executor is configured")]
    MissingExecutor,

    #[error("Recursion limit exceeded: depth {depth} > max {max}")]
    RecursionLimitExceeded { depth: usize, max: usize },

    #[error("Fan-out limit exceeded: {count} sub-tasks > max {max}")]
    FanOutExceeded { count: usize, max: usize },

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid decision state: {0}")]
    InvalidState(#[from] StateTransitionError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunAgentError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunAgentError::Cancelled)
    }

    /// Whether this error came from a depth or fan-out bound
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            RunAgentError::RecursionLimitExceeded { .. } | RunAgentError::FanOutExceeded { .. }
        )
    }
}

/// Output of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunAgentOutput {
    /// The root task
    pub task: Task,
    /// Refiner answer, when a refiner model is configured
    pub final_answer: Option<String>,
    /// Every completed directive in completion order
    pub result_log: ResultLog,
    /// Outcome messages joined by the scratchpad separator
    pub scratchpad: String,
    /// Call tree of the run
    pub tree: DecisionNode,
}

impl RunAgentOutput {
    /// The answer to show a user: the refiner's if present, otherwise the
    /// last log entry's outcome.
    pub fn answer(&self) -> Option<&str> {
        self.final_answer
            .as_deref()
            .or_else(|| self.result_log.last().map(|e| e.outcome.as_str()))
    }
}
