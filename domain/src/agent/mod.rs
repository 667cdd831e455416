//! Agent domain
//!
//! Value objects describing one decision agent run: which model plays
//! which role, what a single decision produced, and the per-decision state
//! machine.

pub mod model_config;
pub mod outcome;
pub mod role;
pub mod state;
pub mod validation;
