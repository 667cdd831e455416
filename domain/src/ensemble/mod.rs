//! Ensemble domain
//!
//! An ensemble samples one model N times for the same query and reconciles
//! the answers with exactly one [`strategy::ReconcileStrategy`].

pub mod result;
pub mod strategy;

pub use result::{CandidateScore, EnsembleResult};
pub use strategy::ReconcileStrategy;
