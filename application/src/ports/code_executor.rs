//! Code executor port
//!
//! Runs model-generated programs in an isolated namespace and reads back the
//! value bound to the `result` variable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to start interpreter: {0}")]
    SpawnFailed(String),

    #[error("Program raised an error: {0}")]
    ProgramFailed(String),

    #[error("Execution timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unreadable executor output: {0}")]
    InvalidOutput(String),
}

/// What a program left behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Value bound to `result`, or `None` when the program never bound it
    pub result: Option<serde_json::Value>,
    /// Captured standard output
    #[serde(default)]
    pub stdout: String,
}

impl ExecutionOutput {
    pub fn with_result(result: serde_json::Value) -> Self {
        Self {
            result: Some(result),
            stdout: String::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a result was produced. JSON `null` counts as absent.
    pub fn produced(&self) -> bool {
        matches!(&self.result, Some(value) if !value.is_null())
    }

    /// Result rendered as text; strings are not quoted.
    pub fn result_text(&self) -> Option<String> {
        match &self.result {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Port for the sandboxed code execution capability
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, source: &str) -> Result<ExecutionOutput, ExecutorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_produced_distinguishes_null() {
        assert!(!ExecutionOutput::empty().produced());
        assert!(!ExecutionOutput::with_result(json!(null)).produced());
        assert!(ExecutionOutput::with_result(json!(0)).produced());
        assert!(ExecutionOutput::with_result(json!("")).produced());
    }

    #[test]
    fn test_result_text() {
        assert_eq!(
            ExecutionOutput::with_result(json!("hi")).result_text(),
            Some("hi".to_string())
        );
        assert_eq!(
            ExecutionOutput::with_result(json!([1, 2])).result_text(),
            Some("[1,2]".to_string())
        );
        assert_eq!(ExecutionOutput::empty().result_text(), None);
    }
}
