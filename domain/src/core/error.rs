//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No candidate answers to select from")]
    EmptyCandidates,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual} (candidate {index})")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Candidate count {candidates} does not match embedding count {embeddings}")]
    CandidateCountMismatch { candidates: usize, embeddings: usize },

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}
