//! Ensemble parameters.

use marshall_domain::ReconcileStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sampling and reconciliation settings for an ensemble run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// Number of independent samples (N).
    pub samples: usize,
    /// Sampling temperature for every sample.
    pub temperature: f32,
    /// Token limit per sample.
    pub max_tokens: u32,
    pub strategy: ReconcileStrategy,
    /// Samples in flight at once; 1 draws them strictly one after another.
    pub concurrency: usize,
    /// Timeout applied to every sample, embedding and refiner call.
    pub call_timeout: Option<Duration>,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            samples: 5,
            temperature: 1.0,
            max_tokens: 1024,
            strategy: ReconcileStrategy::default(),
            concurrency: 1,
            call_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl EnsembleParams {
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_strategy(mut self, strategy: ReconcileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}
