//! Model value object representing an LLM or embedding model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Vendor API family a model is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Available models (Value Object)
///
/// Well-known identifiers get their own variant; anything else is kept
/// verbatim in [`Model::Custom`] and routed by name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // OpenAI chat models
    Gpt4o,
    Gpt4oMini,
    Gpt4Turbo,
    // Anthropic models
    ClaudeOpus3,
    ClaudeSonnet35,
    ClaudeHaiku3,
    // Embedding models
    TextEmbedding3Small,
    TextEmbedding3Large,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4Turbo => "gpt-4-turbo",
            Model::ClaudeOpus3 => "claude-3-opus-20240229",
            Model::ClaudeSonnet35 => "claude-3-5-sonnet-20240620",
            Model::ClaudeHaiku3 => "claude-3-haiku-20240307",
            Model::TextEmbedding3Small => "text-embedding-3-small",
            Model::TextEmbedding3Large => "text-embedding-3-large",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        match self {
            Model::ClaudeOpus3 | Model::ClaudeSonnet35 | Model::ClaudeHaiku3 => true,
            Model::Custom(s) => s.starts_with("claude"),
            _ => false,
        }
    }

    /// Check if this is an embedding model
    pub fn is_embedding(&self) -> bool {
        match self {
            Model::TextEmbedding3Small | Model::TextEmbedding3Large => true,
            Model::Custom(s) => s.contains("embedding"),
            _ => false,
        }
    }

    /// Infer which vendor API serves this model.
    ///
    /// Claude models go to Anthropic; everything else is assumed to speak
    /// the OpenAI-compatible protocol.
    pub fn provider(&self) -> ProviderKind {
        if self.is_claude() {
            ProviderKind::Anthropic
        } else {
            ProviderKind::OpenAi
        }
    }
}

impl Default for Model {
    /// Returns the default chat model (GPT-4o)
    fn default() -> Self {
        Model::Gpt4o
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4-turbo" => Model::Gpt4Turbo,
            "claude-3-opus-20240229" => Model::ClaudeOpus3,
            "claude-3-5-sonnet-20240620" => Model::ClaudeSonnet35,
            "claude-3-haiku-20240307" => Model::ClaudeHaiku3,
            "text-embedding-3-small" => Model::TextEmbedding3Small,
            "text-embedding-3-large" => Model::TextEmbedding3Large,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
