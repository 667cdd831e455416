use crate::config::FileToolConfig;
use marshall_domain::{ToolDefinition, Toolkit};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ToolLoadError {
    #[error("Tool '{0}' has no source")]
    MissingSource(String),

    #[error("Tool '{name}': could not read {}: {source}", .path.display())]
    ReadFailed {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool entry without a name")]
    MissingName,
}

/// Load every configured tool, resolving `source_file` against `base_dir`.
///
/// Inline `source` wins over `source_file` when both are given. Later
/// entries replace earlier ones with the same name.
pub fn load_toolkit(tools: &[FileToolConfig], base_dir: &Path) -> Result<Toolkit, ToolLoadError> {
    let mut toolkit = Toolkit::new();
    for tool in tools {
        if tool.name.trim().is_empty() {
            return Err(ToolLoadError::MissingName);
        }

        let source = match (&tool.source, &tool.source_file) {
            (Some(inline), _) if !inline.trim().is_empty() => inline.clone(),
            (_, Some(file)) => {
                let path = if file.is_absolute() {
                    file.clone()
                } else {
                    base_dir.join(file)
                };
                std::fs::read_to_string(&path).map_err(|source| ToolLoadError::ReadFailed {
                    name: tool.name.clone(),
                    path,
                    source,
                })?
            }
            _ => return Err(ToolLoadError::MissingSource(tool.name.clone())),
        };

        debug!("Loaded tool '{}' ({} bytes)", tool.name, source.len());
        toolkit.add(ToolDefinition::new(
            tool.name.trim(),
            tool.description.clone(),
            source,
        ));
    }
    Ok(toolkit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(name: &str, source: &str) -> FileToolConfig {
        FileToolConfig {
            name: name.to_string(),
            description: format!("{} tool", name),
            source: Some(source.to_string()),
            source_file: None,
        }
    }

    #[test]
    fn test_inline_sources() {
        let tools = [
            inline("add", "def add(a, b):\n    return a + b\n"),
            inline("neg", "def neg(a):\n    return -a\n"),
        ];
        let toolkit = load_toolkit(&tools, Path::new(".")).unwrap();
        assert_eq!(toolkit.len(), 2);
        assert!(toolkit.get("add").unwrap().source.contains("return a + b"));
    }

    #[test]
    fn test_source_file_relative_to_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tools")).unwrap();
        std::fs::write(dir.path().join("tools/shout.py"), "def shout(s):\n    return s.upper()\n")
            .unwrap();

        let tool = FileToolConfig {
            name: "shout".to_string(),
            description: "Upper-case a string".to_string(),
            source: None,
            source_file: Some(PathBuf::from("tools/shout.py")),
        };
        let toolkit = load_toolkit(&[tool], dir.path()).unwrap();
        assert!(toolkit.get("shout").unwrap().source.contains("upper()"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FileToolConfig {
            name: "gone".to_string(),
            source_file: Some(PathBuf::from("gone.py")),
            ..Default::default()
        };
        let err = load_toolkit(&[tool], dir.path()).unwrap_err();
        assert!(matches!(err, ToolLoadError::ReadFailed { .. }));
        assert!(err.to_string().contains("gone.py"));
    }

    #[test]
    fn test_missing_source_and_name() {
        let no_source = FileToolConfig {
            name: "empty".to_string(),
            source: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            load_toolkit(&[no_source], Path::new(".")),
            Err(ToolLoadError::MissingSource(name)) if name == "empty"
        ));
        assert!(matches!(
            load_toolkit(&[inline("", "x = 1")], Path::new(".")),
            Err(ToolLoadError::MissingName)
        ));
    }

    #[test]
    fn test_duplicate_names_replace() {
        let tools = [inline("f", "def f(): return 1"), inline("f", "def f(): return 2")];
        let toolkit = load_toolkit(&tools, Path::new(".")).unwrap();
        assert_eq!(toolkit.len(), 1);
        assert!(toolkit.get("f").unwrap().source.contains("return 2"));
    }
}
