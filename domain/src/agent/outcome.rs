//! Result of a single agent decision

use crate::core::task::Task;
use crate::decision::entities::DecisionKind;
use serde::Serialize;

/// Payload of an [`AgentOutcome`].
///
/// Answers and code executions carry text; a dispatch carries the ordered
/// sub-tasks the caller still has to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutcomeMessage {
    Text(String),
    Subtasks(Vec<Task>),
}

/// What one `decide` call produced.
///
/// `done == false` means the decision was a dispatch and the caller must
/// run the sub-tasks before the branch is complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOutcome {
    /// Task this decision was made for
    pub task: Task,
    /// Branch the model chose
    pub kind: DecisionKind,
    pub success: bool,
    pub done: bool,
    pub message: OutcomeMessage,
    /// Outcome of the automatic repair attempt after a failed code execution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<Box<AgentOutcome>>,
}

impl AgentOutcome {
    /// Outcome of an `answer` decision
    pub fn answered(task: Task, content: &str) -> Self {
        let message = format!("task={}; answer={}", task, content);
        Self {
            task,
            kind: DecisionKind::Answer,
            success: true,
            done: true,
            message: OutcomeMessage::Text(message),
            repair: None,
        }
    }

    /// Outcome of a `code_execute` decision
    ///
    /// `result` is the rendered value bound by the program, or `None` when
    /// nothing was produced.
    pub fn executed(task: Task, code: &str, result: Option<&str>) -> Self {
        let message = format!(
            "task={}; code={}; result={}",
            task,
            code,
            result.unwrap_or("None")
        );
        Self {
            task,
            kind: DecisionKind::CodeExecute,
            success: result.is_some(),
            done: true,
            message: OutcomeMessage::Text(message),
            repair: None,
        }
    }

    /// Outcome of a `dispatch` decision
    pub fn dispatched(task: Task, subtasks: Vec<Task>) -> Self {
        Self {
            task,
            kind: DecisionKind::Dispatch,
            success: true,
            done: false,
            message: OutcomeMessage::Subtasks(subtasks),
            repair: None,
        }
    }

    /// Attach the outcome of a repair attempt
    pub fn with_repair(mut self, repair: AgentOutcome) -> Self {
        self.repair = Some(Box::new(repair));
        self
    }

    /// Sub-tasks dispatched by this decision (empty unless it is a dispatch)
    pub fn subtasks(&self) -> &[Task] {
        match &self.message {
            OutcomeMessage::Subtasks(tasks) => tasks,
            OutcomeMessage::Text(_) => &[],
        }
    }

    /// Sub-tasks the caller still has to run, including any dispatched by
    /// the repair attempt.
    pub fn pending_subtasks(&self) -> Vec<Task> {
        let mut pending = self.subtasks().to_vec();
        if let Some(repair) = &self.repair {
            pending.extend(repair.pending_subtasks());
        }
        pending
    }

    /// Text form of the message; sub-tasks are joined with `, `
    pub fn message_text(&self) -> String {
        match &self.message {
            OutcomeMessage::Text(text) => text.clone(),
            OutcomeMessage::Subtasks(tasks) => tasks
                .iter()
                .map(Task::content)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_outcome() {
        let outcome = AgentOutcome::answered(Task::new("What is 6*7?"), "42");
        assert!(outcome.success);
        assert!(outcome.done);
        assert_eq!(outcome.message_text(), "task=What is 6*7?; answer=42");
        assert!(outcome.subtasks().is_empty());
    }

    #[test]
    fn test_executed_without_result_fails() {
        let outcome = AgentOutcome::executed(Task::new("sum"), "x = 1", None);
        assert!(!outcome.success);
        assert!(outcome.done);
        assert!(outcome.message_text().ends_with("result=None"));
    }

    #[test]
    fn test_dispatched_outcome() {
        let outcome =
            AgentOutcome::dispatched(Task::new("plan"), vec![Task::new("A"), Task::new("B")]);
        assert!(outcome.success);
        assert!(!outcome.done);
        assert_eq!(
            outcome.message,
            OutcomeMessage::Subtasks(vec![Task::new("A"), Task::new("B")])
        );
        assert_eq!(outcome.message_text(), "A, B");
    }

    #[test]
    fn test_pending_subtasks_include_repair_dispatch() {
        let repair = AgentOutcome::dispatched(Task::new("fix"), vec![Task::new("retry step")]);
        let outcome =
            AgentOutcome::executed(Task::new("sum"), "x = 1", None).with_repair(repair);
        assert_eq!(outcome.pending_subtasks(), vec![Task::new("retry step")]);
    }
}
