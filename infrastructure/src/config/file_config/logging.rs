//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [logging]
/// log_file = "marshall.log"          # tracing output
/// transcript = "runs/last.jsonl"     # structured run transcript
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub log_file: Option<PathBuf>,
    pub transcript: Option<PathBuf>,
}
