//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutionParams`]: decision agent control (depth and fan-out bounds, timeouts, memory)
//! - [`EnsembleParams`]: ensemble sampling and reconciliation

pub mod ensemble_params;
pub mod execution_params;

pub use ensemble_params::EnsembleParams;
pub use execution_params::ExecutionParams;
