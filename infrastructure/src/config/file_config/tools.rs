//! Tool configuration from TOML (`[[tools]]` array)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One tool function made available to generated code
///
/// ```toml
/// [[tools]]
/// name = "fetch_page"
/// description = "Download a web page and return its text"
/// source_file = "tools/fetch_page.py"
///
/// [[tools]]
/// name = "add"
/// description = "Add two numbers"
/// source = """
/// def add(a, b):
///     return a + b
/// """
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolConfig {
    pub name: String,
    pub description: String,
    /// Inline source code
    pub source: Option<String>,
    /// Path to the source, relative to the working directory
    pub source_file: Option<PathBuf>,
}

impl FileToolConfig {
    pub fn has_source(&self) -> bool {
        self.source.as_deref().is_some_and(|s| !s.trim().is_empty()) || self.source_file.is_some()
    }
}
