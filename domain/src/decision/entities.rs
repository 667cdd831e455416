//! Decision entities

use crate::core::task::Task;
use serde::{Deserialize, Serialize};

/// The branch a model chose for a task, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Answer,
    CodeExecute,
    Dispatch,
}

impl DecisionKind {
    /// Wire tag for this decision
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Answer => "answer",
            DecisionKind::CodeExecute => "code_execute",
            DecisionKind::Dispatch => "dispatch",
        }
    }

    /// All valid wire tags, in the order they are documented to the model
    pub fn all() -> [DecisionKind; 3] {
        [
            DecisionKind::Dispatch,
            DecisionKind::Answer,
            DecisionKind::CodeExecute,
        ]
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" => Ok(DecisionKind::Answer),
            "code_execute" => Ok(DecisionKind::CodeExecute),
            "dispatch" => Ok(DecisionKind::Dispatch),
            other => Err(other.to_string()),
        }
    }
}

/// A parsed model decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer the task directly
    Answer(String),
    /// Execute the given source code and read back its `result`
    CodeExecute(String),
    /// Split the task into ordered sub-tasks for sub-agents
    Dispatch(Vec<Task>),
}

impl Decision {
    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Answer(_) => DecisionKind::Answer,
            Decision::CodeExecute(_) => DecisionKind::CodeExecute,
            Decision::Dispatch(_) => DecisionKind::Dispatch,
        }
    }

    /// Encode in the wire format a model is asked to produce.
    pub fn to_json(&self) -> serde_json::Value {
        let content = match self {
            Decision::Answer(text) | Decision::CodeExecute(text) => {
                serde_json::Value::String(text.clone())
            }
            Decision::Dispatch(tasks) => serde_json::Value::Array(
                tasks
                    .iter()
                    .map(|t| serde_json::Value::String(t.content().to_string()))
                    .collect(),
            ),
        };
        serde_json::json!({
            "decision": self.kind().as_str(),
            "content": content,
        })
    }
}
