//! Ensemble result value objects

use super::strategy::ReconcileStrategy;
use serde::Serialize;

/// Similarity score of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub index: usize,
    pub score: f64,
}

/// Final output of one ensemble run.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleResult {
    pub query: String,
    pub strategy: ReconcileStrategy,
    /// Sampled answers, in sample order
    pub candidates: Vec<String>,
    /// The reconciled answer
    pub answer: String,
    /// Index of the chosen candidate (similarity strategy only)
    pub selected_index: Option<usize>,
    /// Per-candidate scores (similarity strategy with two or more candidates)
    pub scores: Vec<CandidateScore>,
}

impl EnsembleResult {
    /// Result chosen by similarity voting
    pub fn selected(
        query: impl Into<String>,
        candidates: Vec<String>,
        index: usize,
        scores: Vec<f64>,
    ) -> Self {
        let answer = candidates.get(index).cloned().unwrap_or_default();
        Self {
            query: query.into(),
            strategy: ReconcileStrategy::Similarity,
            candidates,
            answer,
            selected_index: Some(index),
            scores: scores
                .into_iter()
                .enumerate()
                .map(|(index, score)| CandidateScore { index, score })
                .collect(),
        }
    }

    /// Result written by a refiner model
    pub fn refined(
        query: impl Into<String>,
        candidates: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            strategy: ReconcileStrategy::Agent,
            candidates,
            answer: answer.into(),
            selected_index: None,
            scores: Vec::new(),
        }
    }
}
