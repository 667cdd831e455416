//! Provider configuration from TOML (`[providers]` section)

use marshall_domain::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anthropic API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible servers).
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
        }
    }
}

/// Resolve an API key: the inline value wins, then the named env var.
pub(crate) fn resolve_api_key(inline: Option<&str>, env_name: &str) -> Option<String> {
    inline
        .map(str::to_string)
        .or_else(|| std::env::var(env_name).ok())
        .filter(|k| !k.trim().is_empty())
}

impl FileAnthropicConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Anthropic API settings.
    pub anthropic: FileAnthropicConfig,
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
    /// Explicit model → provider routing overrides ("openai" | "anthropic").
    pub routing: HashMap<String, String>,
}

impl FileProvidersConfig {
    /// Routing overrides with known provider names; unknown names are skipped.
    pub fn routing_overrides(&self) -> HashMap<String, ProviderKind> {
        self.routing
            .iter()
            .filter_map(|(model, provider)| {
                provider
                    .parse::<ProviderKind>()
                    .ok()
                    .map(|kind| (model.clone(), kind))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_key_wins() {
        assert_eq!(
            resolve_api_key(Some("sk-inline"), "MARSHALL_TEST_UNSET_KEY"),
            Some("sk-inline".to_string())
        );
        assert_eq!(resolve_api_key(None, "MARSHALL_TEST_UNSET_KEY"), None);
        assert_eq!(resolve_api_key(Some(" "), "MARSHALL_TEST_UNSET_KEY"), None);
    }

    #[test]
    fn test_routing_overrides_skip_unknown() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[routing]
"my-model" = "anthropic"
"other" = "bedrock"
"#,
        )
        .unwrap();
        let overrides = config.routing_overrides();
        assert_eq!(overrides.get("my-model"), Some(&ProviderKind::Anthropic));
        assert!(!overrides.contains_key("other"));
    }
}
