//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_agent;
pub mod run_ensemble;
pub mod select_answer;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod testing;
