//! Run progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to display progress of agent and ensemble runs.
//!
//! # Callback Categories
//!
//! - **Decision callbacks**: a task was handed to a model and decided
//! - **Execution callbacks**: generated code ran (or a repair was issued)
//! - **Ensemble callbacks**: samples were drawn and reconciled
//!
//! # Example Implementation
//!
//! ```ignore
//! use marshall_application::ports::agent_progress::AgentProgressNotifier;
//!
//! struct MyProgress;
//!
//! impl AgentProgressNotifier for MyProgress {
//!     fn on_decision(&self, task: &Task, kind: DecisionKind, depth: usize) {
//!         println!("{}{} -> {}", "  ".repeat(depth), task, kind);
//!     }
//! }
//! ```

use marshall_domain::{AgentRole, DecisionKind, ReconcileStrategy, Task};

/// Progress notifier for agent and ensemble runs.
///
/// All methods have default no-op implementations, so implementers only
/// need to override the callbacks they care about.
pub trait AgentProgressNotifier: Send + Sync {
    /// Called before a task is sent to a model
    fn on_decision_start(&self, _task: &Task, _role: AgentRole, _depth: usize) {}

    /// Called once the model's decision has been parsed
    fn on_decision(&self, _task: &Task, _kind: DecisionKind, _depth: usize) {}

    /// Called after generated code ran
    fn on_code_executed(&self, _task: &Task, _success: bool) {}

    /// Called when a failed execution triggers a repair decision
    fn on_repair(&self, _task: &Task) {}

    /// Called before the refiner distils a finished run
    fn on_refine_start(&self) {}

    /// Called when an ensemble starts sampling
    fn on_ensemble_start(&self, _samples: usize) {}

    /// Called as each ensemble sample arrives
    fn on_sample_complete(&self, _index: usize, _success: bool) {}

    /// Called when reconciliation starts
    fn on_reconcile_start(&self, _strategy: ReconcileStrategy) {}

    /// Called when an ensemble has picked its answer
    fn on_ensemble_complete(&self, _selected_index: Option<usize>) {}
}

/// No-op progress notifier
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
