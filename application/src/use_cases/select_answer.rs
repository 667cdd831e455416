//! Select Answer use case
//!
//! Embedding-similarity voting over candidate answers. Every candidate is
//! embedded once; the candidate with the smallest mean distance to its peers
//! wins. A single candidate is returned as-is without any embedding call.

use super::shared::{TimedOut, with_timeout};
use crate::ports::embedder::{Embedder, EmbeddingError};
use marshall_domain::{DomainError, Embedding, centrality_scores, most_central};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No candidate answers to select from")]
    EmptyCandidates,

    #[error("Embedding candidate {index} failed: {source}")]
    EmbeddingFailure {
        index: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("Embedding dimension mismatch at candidate {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Embedding candidate {index} timed out after {limit:?}")]
    Timeout { index: usize, limit: Duration },
}

impl From<DomainError> for SelectionError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::DimensionMismatch {
                index,
                expected,
                actual,
            } => SelectionError::DimensionMismatch {
                index,
                expected,
                actual,
            },
            _ => SelectionError::EmptyCandidates,
        }
    }
}

/// The winning candidate and how every candidate scored
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub answer: String,
    pub index: usize,
    /// Score per candidate, in input order
    pub scores: Vec<f64>,
}

/// Similarity voting over an [`Embedder`]
pub struct SimilaritySelector {
    embedder: Arc<dyn Embedder>,
    call_timeout: Option<Duration>,
}

impl SimilaritySelector {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            call_timeout: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Pick the most central answer. Returns the input string unchanged.
    pub async fn select(&self, answers: &[String]) -> Result<Selection, SelectionError> {
        match answers {
            [] => return Err(SelectionError::EmptyCandidates),
            [only] => {
                debug!("Single candidate, skipping embedding");
                return Ok(Selection {
                    answer: only.clone(),
                    index: 0,
                    scores: vec![0.0],
                });
            }
            _ => {}
        }

        let mut embeddings: Vec<Embedding> = Vec::with_capacity(answers.len());
        for (index, answer) in answers.iter().enumerate() {
            let embedding = with_timeout(self.call_timeout, self.embedder.embed(answer))
                .await
                .map_err(|TimedOut(limit)| SelectionError::Timeout { index, limit })?
                .map_err(|source| {
                    warn!("Embedding candidate {} failed: {}", index, source);
                    SelectionError::EmbeddingFailure { index, source }
                })?;
            embeddings.push(embedding);
        }

        let scores = centrality_scores(&embeddings)?;
        let index = most_central(&scores).unwrap_or(0);
        info!(
            "Selected candidate {} of {} (score {:.4})",
            index,
            answers.len(),
            scores[index]
        );

        Ok(Selection {
            answer: answers[index].clone(),
            index,
            scores,
        })
    }
}
