//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application parameters
//! on demand.

mod agent;
mod ensemble;
mod executor;
mod logging;
mod models;
mod providers;
mod tools;

pub use agent::FileAgentConfig;
pub use ensemble::FileEnsembleConfig;
pub use executor::FileExecutorConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig};
pub use tools::FileToolConfig;

use marshall_domain::{ConfigIssue, ConfigIssueCode, ReconcileStrategy};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Decision agent bounds and memory
    pub agent: FileAgentConfig,
    /// Ensemble sampling and reconciliation
    pub ensemble: FileEnsembleConfig,
    /// Python executor
    pub executor: FileExecutorConfig,
    /// Vendor API settings
    pub providers: FileProvidersConfig,
    /// Tool functions available to generated code
    pub tools: Vec<FileToolConfig>,
    /// Log and transcript destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks, in order:
    /// 1. Empty model names
    /// 2. Agent and ensemble enum values and counts
    /// 3. Strategy / capability mismatches
    /// 4. Tools without source
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Model names
        issues.extend(self.models.issues());

        // 2. Sections
        issues.extend(self.agent.issues());
        issues.extend(self.ensemble.issues());

        // 3. Capabilities the chosen strategy needs
        match self.ensemble.parse_strategy().0 {
            ReconcileStrategy::Agent if self.models.parse_refiner().0.is_none() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingCapability {
                        strategy: "agent".to_string(),
                        capability: "models.refiner".to_string(),
                    },
                    "ensemble.strategy = \"agent\" requires models.refiner",
                ));
            }
            ReconcileStrategy::Similarity if self.models.embedding_model().is_none() => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingCapability {
                        strategy: "similarity".to_string(),
                        capability: "models.embedding".to_string(),
                    },
                    "ensemble.strategy = \"similarity\" requires models.embedding",
                ));
            }
            _ => {}
        }

        // 4. Tools
        for tool in &self.tools {
            if !tool.has_source() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ToolWithoutSource {
                        tool: tool.name.clone(),
                    },
                    format!("tools.{}: needs `source` or `source_file`", tool.name),
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_full_toml() {
        let config: FileConfig = toml::from_str(
            r#"
[models]
base = "gpt-4o"
sub = "gpt-4o-mini"
refiner = "claude-3-5-sonnet-20240620"

[agent]
max_depth = 2
context_retention = "accumulate"

[ensemble]
samples = 3
strategy = "agent"

[executor]
python = "/usr/bin/python3"

[providers.openai]
base_url = "http://localhost:8080"

[[tools]]
name = "add"
description = "Add two numbers"
source = "def add(a, b):\n    return a + b"

[logging]
transcript = "run.jsonl"
"#,
        )
        .unwrap();

        assert!(config.validate().is_empty());
        assert_eq!(config.agent.max_depth, 2);
        assert_eq!(config.ensemble.samples, 3);
        assert_eq!(config.executor.python, "/usr/bin/python3");
        assert_eq!(config.providers.openai.base_url, "http://localhost:8080");
        assert_eq!(config.tools.len(), 1);
        assert!(config.logging.transcript.is_some());
    }

    #[test]
    fn test_agent_strategy_without_refiner() {
        let config: FileConfig = toml::from_str("[ensemble]\nstrategy = \"agent\"").unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::MissingCapability { .. }
        ));
    }

    #[test]
    fn test_tool_without_source() {
        let config: FileConfig =
            toml::from_str("[[tools]]\nname = \"ghost\"\ndescription = \"nothing\"").unwrap();
        let issues = config.validate();
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::ToolWithoutSource { tool } if tool == "ghost"
        ));
    }
}
