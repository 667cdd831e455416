//! Configuration file loading for marshall
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MARSHALL_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./marshall.toml` or `./.marshall.toml`
//! 4. Global: `$XDG_CONFIG_HOME/marshall/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileAnthropicConfig, FileConfig, FileEnsembleConfig, FileExecutorConfig,
    FileLoggingConfig, FileModelsConfig, FileOpenAiConfig, FileProvidersConfig, FileToolConfig,
};
pub use loader::ConfigLoader;
