//! Reconciliation strategies

use serde::{Deserialize, Serialize};

/// How an ensemble turns N candidate answers into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Pick the answer whose embedding is closest to all the others
    #[default]
    Similarity,
    /// Ask a refiner model to choose the best answer
    Agent,
}

impl ReconcileStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileStrategy::Similarity => "similarity",
            ReconcileStrategy::Agent => "agent",
        }
    }

    /// Valid config values, for error messages
    pub fn valid_values() -> Vec<String> {
        vec!["similarity".to_string(), "agent".to_string()]
    }
}

impl std::fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReconcileStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "similarity" | "vote" | "embedding" => Ok(ReconcileStrategy::Similarity),
            "agent" | "refiner" => Ok(ReconcileStrategy::Agent),
            other => Err(format!("unknown reconcile strategy '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!("similarity".parse(), Ok(ReconcileStrategy::Similarity));
        assert_eq!("Refiner".parse(), Ok(ReconcileStrategy::Agent));
        assert!("majority".parse::<ReconcileStrategy>().is_err());
    }

    #[test]
    fn test_default_is_similarity() {
        assert_eq!(ReconcileStrategy::default(), ReconcileStrategy::Similarity);
    }
}
