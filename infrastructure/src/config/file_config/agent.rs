//! Decision agent configuration from TOML (`[agent]` section)

use marshall_application::ExecutionParams;
use marshall_domain::{ConfigIssue, ConfigIssueCode, ContextRetention};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_depth = 3
/// max_fan_out = 8
/// max_repair_attempts = 1
/// call_timeout_secs = 120
/// context_retention = "rolling:1"   # or "accumulate"
/// memory_entries = 0                 # latest N log entries in memory; 0 = all
/// max_tokens = 1024
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_depth: usize,
    pub max_fan_out: usize,
    pub max_repair_attempts: usize,
    /// Per-call timeout in seconds; 0 disables it
    pub call_timeout_secs: u64,
    pub context_retention: String,
    /// Log entries rendered into memory; 0 renders the whole log
    pub memory_entries: usize,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_depth: params.max_depth,
            max_fan_out: params.max_fan_out,
            max_repair_attempts: params.max_repair_attempts,
            call_timeout_secs: params.call_timeout.map_or(0, |d| d.as_secs()),
            context_retention: params.context_retention.to_string(),
            memory_entries: params.memory_entries.unwrap_or(0),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

impl FileAgentConfig {
    /// Parse the retention policy, falling back to the default on bad input.
    pub fn parse_context_retention(&self) -> (ContextRetention, Vec<ConfigIssue>) {
        let zero_window = self
            .context_retention
            .trim()
            .to_lowercase()
            .strip_prefix("rolling:")
            .is_some_and(|n| n.trim().parse::<usize>() == Ok(0));
        match self.context_retention.parse::<ContextRetention>() {
            Ok(retention) => (retention, Vec::new()),
            Err(reason) if zero_window => (
                ContextRetention::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::ZeroCount {
                        field: "agent.context_retention".to_string(),
                    },
                    format!("agent.context_retention: {}", reason),
                )],
            ),
            Err(_) => (
                ContextRetention::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "agent.context_retention".to_string(),
                        value: self.context_retention.clone(),
                        valid_values: vec![
                            "accumulate".to_string(),
                            "rolling".to_string(),
                            "rolling:<n>".to_string(),
                        ],
                    },
                    format!(
                        "agent.context_retention: unknown value '{}', falling back to '{}'",
                        self.context_retention,
                        ContextRetention::default()
                    ),
                )],
            ),
        }
    }

    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_context_retention().1;
        if self.max_fan_out == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCount {
                    field: "agent.max_fan_out".to_string(),
                },
                "agent.max_fan_out must be at least 1",
            ));
        }
        if self.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCount {
                    field: "agent.max_tokens".to_string(),
                },
                "agent.max_tokens must be at least 1",
            ));
        }
        issues
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        let timeout =
            (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs));
        ExecutionParams::default()
            .with_max_depth(self.max_depth)
            .with_max_fan_out(self.max_fan_out)
            .with_max_repair_attempts(self.max_repair_attempts)
            .with_call_timeout(timeout)
            .with_context_retention(self.parse_context_retention().0)
            .with_memory_entries((self.memory_entries > 0).then_some(self.memory_entries))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}
