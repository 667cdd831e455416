//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use marshall_domain::Model;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Sampling configuration for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Ask the provider for a JSON object response
    pub json_mode: bool,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            json_mode: false,
            temperature: None,
            max_tokens: 1024,
        }
    }
}

impl GenerationConfig {
    pub fn json() -> Self {
        Self {
            json_mode: true,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// One completion request.
///
/// `instructions` is an ordered snapshot of the caller's instruction
/// context; adapters send it as system content ahead of `prompt`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub instructions: Vec<String>,
    pub prompt: String,
    pub config: GenerationConfig,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            instructions: Vec::new(),
            prompt: prompt.into(),
            config: GenerationConfig::default(),
        }
    }

    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// All instructions joined into one system prompt.
    pub fn system_prompt(&self) -> Option<String> {
        if self.instructions.is_empty() {
            None
        } else {
            Some(self.instructions.join("\n\n"))
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate a completion for the request with the given model
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError>;
}
