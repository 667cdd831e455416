//! Decision state machine and the call tree of a run.
//!
//! Every task goes through:
//!
//! ```text
//! Pending → Decided(answer | code_execute) → Completed
//! Pending → Decided(dispatch) ──(all children Completed)──→ Completed
//! ```
//!
//! A dispatch is the only non-terminal decision: it expands into one child
//! node per sub-task, and the parent completes only after every child has.

use super::outcome::AgentOutcome;
use super::role::AgentRole;
use crate::core::task::Task;
use crate::decision::entities::DecisionKind;
use serde::Serialize;
use thiserror::Error;

/// Lifecycle of one task inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "decision")]
pub enum DecisionState {
    Pending,
    Decided(DecisionKind),
    Completed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal decision state transition: {from} -> {to}")]
pub struct StateTransitionError {
    pub from: DecisionState,
    pub to: DecisionState,
}

impl DecisionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DecisionState::Completed)
    }

    /// Whether `self -> next` is an edge of the state graph.
    pub fn can_advance_to(self, next: DecisionState) -> bool {
        matches!(
            (self, next),
            (DecisionState::Pending, DecisionState::Decided(_))
                | (DecisionState::Decided(_), DecisionState::Completed)
        )
    }

    /// Move to `next`, rejecting edges outside the state graph.
    pub fn advance(self, next: DecisionState) -> Result<DecisionState, StateTransitionError> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(StateTransitionError { from: self, to: next })
        }
    }
}

impl std::fmt::Display for DecisionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionState::Pending => write!(f, "Pending"),
            DecisionState::Decided(kind) => write!(f, "Decided({})", kind),
            DecisionState::Completed => write!(f, "Completed"),
        }
    }
}

/// One node of a run's call tree.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionNode {
    pub task: Task,
    pub role: AgentRole,
    pub depth: usize,
    pub state: DecisionState,
    pub outcome: AgentOutcome,
    pub children: Vec<DecisionNode>,
}

impl DecisionNode {
    /// Create a node for a decided task; dispatches stay open until
    /// [`DecisionNode::complete`] is called.
    pub fn new(
        role: AgentRole,
        depth: usize,
        outcome: AgentOutcome,
    ) -> Result<Self, StateTransitionError> {
        let mut state = DecisionState::Pending.advance(DecisionState::Decided(outcome.kind))?;
        if outcome.done {
            state = state.advance(DecisionState::Completed)?;
        }
        Ok(Self {
            task: outcome.task.clone(),
            role,
            depth,
            state,
            outcome,
            children: Vec::new(),
        })
    }

    /// Close a dispatch node once all of its children have completed.
    pub fn complete(&mut self, children: Vec<DecisionNode>) -> Result<(), StateTransitionError> {
        if let Some(open) = children.iter().find(|c| !c.state.is_terminal()) {
            return Err(StateTransitionError {
                from: open.state,
                to: DecisionState::Completed,
            });
        }
        self.state = self.state.advance(DecisionState::Completed)?;
        self.children = children;
        Ok(())
    }

    /// Number of decisions in this subtree, repairs included.
    pub fn decision_count(&self) -> usize {
        let mut count = 1;
        let mut repair = self.outcome.repair.as_deref();
        while let Some(r) = repair {
            count += 1;
            repair = r.repair.as_deref();
        }
        count + self.children.iter().map(DecisionNode::decision_count).sum::<usize>()
    }

    /// Deepest depth reached in this subtree.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(DecisionNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        let decided = DecisionState::Pending
            .advance(DecisionState::Decided(DecisionKind::Answer))
            .unwrap();
        assert_eq!(
            decided.advance(DecisionState::Completed).unwrap(),
            DecisionState::Completed
        );
    }

    #[test]
    fn test_pending_cannot_complete_directly() {
        let err = DecisionState::Pending
            .advance(DecisionState::Completed)
            .unwrap_err();
        assert_eq!(err.from, DecisionState::Pending);
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(DecisionState::Completed.is_terminal());
        assert!(
            DecisionState::Completed
                .advance(DecisionState::Decided(DecisionKind::Dispatch))
                .is_err()
        );
    }

    #[test]
    fn test_answer_node_completes_immediately() {
        let node = DecisionNode::new(
            AgentRole::Base,
            0,
            AgentOutcome::answered(Task::new("q"), "a"),
        )
        .unwrap();
        assert_eq!(node.state, DecisionState::Completed);
    }

    #[test]
    fn test_dispatch_node_waits_for_children() {
        let mut parent = DecisionNode::new(
            AgentRole::Base,
            0,
            AgentOutcome::dispatched(Task::new("q"), vec![Task::new("A")]),
        )
        .unwrap();
        assert_eq!(
            parent.state,
            DecisionState::Decided(DecisionKind::Dispatch)
        );

        let child = DecisionNode::new(
            AgentRole::Sub,
            1,
            AgentOutcome::answered(Task::new("A"), "done"),
        )
        .unwrap();
        parent.complete(vec![child]).unwrap();

        assert_eq!(parent.state, DecisionState::Completed);
        assert_eq!(parent.decision_count(), 2);
        assert_eq!(parent.max_depth(), 1);
    }

    #[test]
    fn test_dispatch_with_open_child_cannot_complete() {
        let mut parent = DecisionNode::new(
            AgentRole::Base,
            0,
            AgentOutcome::dispatched(Task::new("q"), vec![Task::new("A")]),
        )
        .unwrap();
        let open_child = DecisionNode::new(
            AgentRole::Sub,
            1,
            AgentOutcome::dispatched(Task::new("A"), vec![Task::new("A.1")]),
        )
        .unwrap();
        assert!(parent.complete(vec![open_child]).is_err());
    }
}
