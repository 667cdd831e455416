//! Code executor configuration from TOML (`[executor]` section)

use serde::{Deserialize, Serialize};

/// Python executor settings
///
/// ```toml
/// [executor]
/// python = "python3"
/// timeout_secs = 60
/// max_output_bytes = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Set to false to run without a code executor
    pub enabled: bool,
    /// Interpreter binary
    pub python: String,
    pub timeout_secs: u64,
    /// Captured stdout beyond this many bytes is truncated
    pub max_output_bytes: usize,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            python: "python3".to_string(),
            timeout_secs: 60,
            max_output_bytes: 64 * 1024,
        }
    }
}
