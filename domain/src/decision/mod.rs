//! Decision protocol
//!
//! A model answers every task with exactly one [`Decision`]:
//!
//! ```text
//! {"decision": "answer",       "content": "42"}
//! {"decision": "code_execute", "content": "result = sum(range(10))"}
//! {"decision": "dispatch",     "content": ["step one", "step two"]}
//! ```
//!
//! [`parsing::parse_decision`] turns raw model output into the tagged
//! union; anything else is a [`parsing::DecisionParseError`].

pub mod entities;
pub mod parsing;

pub use entities::{Decision, DecisionKind};
pub use parsing::{DecisionParseError, parse_decision};
