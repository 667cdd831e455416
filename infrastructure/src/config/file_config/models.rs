//! Role-based model configuration from TOML (`[models]` section)

use marshall_domain::{AgentModels, ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// base = "gpt-4o"                         # Root task decisions
/// sub = "gpt-4o-mini"                     # Dispatched sub-tasks and repairs
/// refiner = "claude-3-5-sonnet-20240620"  # Final answer / ensemble refiner
/// ensemble = "gpt-4o-mini"                # Sampled model for `marshall ensemble`
/// embedding = "text-embedding-3-small"    # Similarity voting
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model for the root task
    pub base: String,
    /// Model for sub-tasks (defaults to `base`)
    pub sub: Option<String>,
    /// Model that distils a run or reconciles ensemble answers
    pub refiner: Option<String>,
    /// Model sampled by the ensemble (defaults to `base`)
    pub ensemble: Option<String>,
    /// Embedding model for similarity voting
    pub embedding: String,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            base: Model::Gpt4o.to_string(),
            sub: None,
            refiner: None,
            ensemble: None,
            embedding: Model::TextEmbedding3Small.to_string(),
        }
    }
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&str>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.to_string(),
                    },
                    format!("models.{}: model name cannot be empty", field),
                )],
            ),
            Some(s) => {
                // Model::from_str is infallible; unknown names become Custom(...)
                let Ok(model) = s.trim().parse::<Model>();
                (Some(model), Vec::new())
            }
        }
    }

    pub fn parse_base(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("base", Some(&self.base))
    }

    pub fn parse_sub(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("sub", self.sub.as_deref())
    }

    pub fn parse_refiner(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("refiner", self.refiner.as_deref())
    }

    pub fn parse_ensemble(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("ensemble", self.ensemble.as_deref())
    }

    pub fn parse_embedding(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("embedding", Some(&self.embedding))
    }

    /// Every model issue in this section
    pub fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.parse_base().1);
        issues.extend(self.parse_sub().1);
        issues.extend(self.parse_refiner().1);
        issues.extend(self.parse_ensemble().1);
        issues.extend(self.parse_embedding().1);
        issues
    }

    /// Build [`AgentModels`]; unset or empty roles fall back to `base`.
    pub fn to_agent_models(&self) -> AgentModels {
        let base = self.parse_base().0.unwrap_or_default();
        let mut models = AgentModels::new(base);
        if let Some(sub) = self.parse_sub().0 {
            models = models.with_sub(sub);
        }
        if let Some(refiner) = self.parse_refiner().0 {
            models = models.with_refiner(refiner);
        }
        models
    }

    /// Model sampled by the ensemble
    pub fn ensemble_model(&self) -> Model {
        self.parse_ensemble()
            .0
            .or_else(|| self.parse_base().0)
            .unwrap_or_default()
    }

    pub fn embedding_model(&self) -> Option<Model> {
        self.parse_embedding().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileModelsConfig::default();
        let models = config.to_agent_models();
        assert_eq!(models.base, Model::Gpt4o);
        assert_eq!(models.sub, Model::Gpt4o);
        assert!(models.refiner.is_none());
        assert_eq!(config.embedding_model(), Some(Model::TextEmbedding3Small));
        assert!(config.issues().is_empty());
    }

    #[test]
    fn test_roles_from_toml() {
        let config: FileModelsConfig = toml::from_str(
            r#"
base = "gpt-4o"
sub = "gpt-4o-mini"
refiner = "claude-3-5-sonnet-20240620"
"#,
        )
        .unwrap();

        let models = config.to_agent_models();
        assert_eq!(models.sub, Model::Gpt4oMini);
        assert_eq!(models.refiner, Some(Model::ClaudeSonnet35));
        assert_eq!(config.ensemble_model(), Model::Gpt4o);
    }

    #[test]
    fn test_empty_name_is_an_issue() {
        let config = FileModelsConfig {
            sub: Some("  ".to_string()),
            ..Default::default()
        };
        let issues = config.issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(config.to_agent_models().sub, Model::Gpt4o);
    }
}
