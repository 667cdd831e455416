//! Run memory
//!
//! - [`result_log::ResultLog`]: append-only record of completed directives
//! - [`instruction_context::InstructionContext`]: per-role instructions
//!   snapshot passed to the model on each call

pub mod instruction_context;
pub mod result_log;
