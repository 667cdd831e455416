//! Execution parameters: decision agent control.
//!
//! [`ExecutionParams`] groups the static parameters that bound a
//! [`DecisionAgent`](crate::use_cases::run_agent::DecisionAgent) run.
//! These are application-layer concerns, not domain policy.

use marshall_domain::ContextRetention;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision agent control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Deepest sub-task level allowed below the root task (root is depth 0).
    pub max_depth: usize,
    /// Maximum number of sub-tasks a single dispatch may issue.
    pub max_fan_out: usize,
    /// Automatic repair decisions after a failed code execution.
    pub max_repair_attempts: usize,
    /// Timeout applied to every model and executor call.
    pub call_timeout: Option<Duration>,
    /// How much rendered memory each role's instruction context keeps.
    pub context_retention: ContextRetention,
    /// Render only the latest N log entries into memory (whole log when unset).
    pub memory_entries: Option<usize>,
    /// Token limit for decision calls.
    pub max_tokens: u32,
    /// Sampling temperature for decision calls (provider default when unset).
    pub temperature: Option<f32>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_fan_out: 8,
            max_repair_attempts: 1,
            call_timeout: Some(Duration::from_secs(120)),
            context_retention: ContextRetention::default(),
            memory_entries: None,
            max_tokens: 1024,
            temperature: None,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    pub fn with_max_fan_out(mut self, max: usize) -> Self {
        self.max_fan_out = max;
        self
    }

    pub fn with_max_repair_attempts(mut self, max: usize) -> Self {
        self.max_repair_attempts = max;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_context_retention(mut self, retention: ContextRetention) -> Self {
        self.context_retention = retention;
        self
    }

    pub fn with_memory_entries(mut self, entries: Option<usize>) -> Self {
        self.memory_entries = entries;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}
