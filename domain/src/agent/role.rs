//! Agent roles

use serde::{Deserialize, Serialize};

/// Which agent is making the current decision.
///
/// The initial task is handled by the base agent; every dispatched
/// sub-task (and every code-repair attempt) is handled by a sub-agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    #[default]
    Base,
    Sub,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Base => "base",
            AgentRole::Sub => "sub",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
