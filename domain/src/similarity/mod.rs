//! Similarity voting among candidate answers.
//!
//! Each candidate is scored by the negated mean Euclidean distance from its
//! embedding to every other candidate's embedding. The candidate closest to
//! the rest of the answer cloud gets the highest score.
//!
//! ```
//! use marshall_domain::{centrality_scores, most_central};
//!
//! let embeddings = vec![vec![0.0, 0.0], vec![0.1, 0.0], vec![5.0, 5.0]];
//! let scores = centrality_scores(&embeddings).unwrap();
//! assert_eq!(most_central(&scores), Some(1));
//! ```

use crate::core::error::DomainError;

/// Fixed-length embedding vector.
pub type Embedding = Vec<f32>;

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Score every embedding by `-mean(distance to all others)`.
///
/// A single embedding has no peers and scores `0.0`.
pub fn centrality_scores(embeddings: &[Embedding]) -> Result<Vec<f64>, DomainError> {
    let Some(first) = embeddings.first() else {
        return Err(DomainError::EmptyCandidates);
    };

    let dim = first.len();
    if let Some((index, e)) = embeddings.iter().enumerate().find(|(_, e)| e.len() != dim) {
        return Err(DomainError::DimensionMismatch {
            index,
            expected: dim,
            actual: e.len(),
        });
    }

    let n = embeddings.len();
    if n == 1 {
        return Ok(vec![0.0]);
    }

    let peers = (n - 1) as f64;
    let scores = (0..n)
        .map(|i| {
            let total: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| euclidean_distance(&embeddings[i], &embeddings[j]))
                .sum();
            -(total / peers)
        })
        .collect();

    Ok(scores)
}

/// Index of the highest score. The first index wins ties; NaN never wins.
pub fn most_central(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_single_embedding_scores_zero() {
        assert_eq!(centrality_scores(&[vec![1.0, 2.0]]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(centrality_scores(&[]), Err(DomainError::EmptyCandidates));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = centrality_scores(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            DomainError::DimensionMismatch {
                index: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_outlier_scores_lowest() {
        let embeddings = vec![vec![0.0], vec![1.0], vec![10.0]];
        let scores = centrality_scores(&embeddings).unwrap();
        // mean distances: [5.5, 5.0, 9.5]
        assert_eq!(scores, vec![-5.5, -5.0, -9.5]);
        assert_eq!(most_central(&scores), Some(1));
    }

    #[test]
    fn test_identical_embeddings_pick_first() {
        let embeddings = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]];
        let scores = centrality_scores(&embeddings).unwrap();
        assert_eq!(most_central(&scores), Some(0));
    }

    #[test]
    fn test_tie_between_later_pair() {
        // 0 is the outlier; 1 and 2 tie and the earlier one wins
        let embeddings = vec![vec![9.0], vec![0.0], vec![0.0]];
        let scores = centrality_scores(&embeddings).unwrap();
        assert_eq!(most_central(&scores), Some(1));
    }

    #[test]
    fn test_most_central_skips_nan() {
        assert_eq!(most_central(&[f64::NAN, -2.0, -1.0]), Some(2));
        assert_eq!(most_central(&[]), None);
    }
}
