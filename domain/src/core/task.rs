//! Task value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// An instruction handed to exactly one agent invocation (Value Object)
///
/// Tasks are issued either by the caller or by a parent agent's dispatch
/// decision and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    content: String,
}

impl Task {
    /// Create a new task
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Task cannot be empty");
        Self { content }
    }

    /// Try to create a new task, returning None if blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the task instruction
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Task {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Task::try_new(s).ok_or_else(|| DomainError::InvalidTask("task is blank".to_string()))
    }
}

impl TryFrom<&str> for Task {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Task::try_from(s.to_string())
    }
}

impl AsRef<str> for Task {
    fn as_ref(&self) -> &str {
        &self.content
    }
}
