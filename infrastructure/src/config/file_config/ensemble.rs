//! Ensemble configuration from TOML (`[ensemble]` section)

use marshall_application::EnsembleParams;
use marshall_domain::{ConfigIssue, ConfigIssueCode, ReconcileStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ensemble configuration from TOML
///
/// # Example
///
/// ```toml
/// [ensemble]
/// samples = 5
/// temperature = 1.0
/// strategy = "similarity"   # or "agent"
/// concurrency = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEnsembleConfig {
    pub samples: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub strategy: String,
    pub concurrency: usize,
    /// Per-call timeout in seconds; 0 disables it
    pub call_timeout_secs: u64,
}

impl Default for FileEnsembleConfig {
    fn default() -> Self {
        let params = EnsembleParams::default();
        Self {
            samples: params.samples,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            strategy: params.strategy.to_string(),
            concurrency: params.concurrency,
            call_timeout_secs: params.call_timeout.map_or(0, |d| d.as_secs()),
        }
    }
}

impl FileEnsembleConfig {
    pub fn parse_strategy(&self) -> (ReconcileStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<ReconcileStrategy>() {
            Ok(strategy) => (strategy, Vec::new()),
            Err(_) => (
                ReconcileStrategy::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "ensemble.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: ReconcileStrategy::valid_values(),
                    },
                    format!("ensemble.strategy: unknown value '{}'", self.strategy),
                )],
            ),
        }
    }

    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_strategy().1;
        if self.samples == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCount {
                    field: "ensemble.samples".to_string(),
                },
                "ensemble.samples must be at least 1",
            ));
        }
        if self.concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroCount {
                    field: "ensemble.concurrency".to_string(),
                },
                "ensemble.concurrency is 0; samples will be drawn one at a time",
            ));
        }
        issues
    }

    pub fn to_ensemble_params(&self) -> EnsembleParams {
        let timeout = (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs));
        let mut params = EnsembleParams::default()
            .with_samples(self.samples)
            .with_temperature(self.temperature)
            .with_strategy(self.parse_strategy().0)
            .with_concurrency(self.concurrency.max(1))
            .with_call_timeout(timeout);
        params.max_tokens = self.max_tokens;
        params
    }
}
