//! Toolkit registry and rendering

use serde::{Deserialize, Serialize};

/// A tool function available in the execution namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub source: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source: source.into(),
        }
    }
}

/// Ordered set of tools, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolkit {
    tools: Vec<ToolDefinition>,
}

impl Toolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn add(&mut self, tool: ToolDefinition) {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.add(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Human-readable tool list for the system instructions.
    pub fn render_description(&self) -> String {
        let mut out = String::new();
        for tool in &self.tools {
            out.push_str(&format!(
                "Name: {}\nDescription: {}\nSource:\n```python\n{}\n```\n\n",
                tool.name,
                tool.description,
                tool.source.trim_end()
            ));
        }
        out
    }

    /// Source preamble prepended to executed code.
    ///
    /// Each tool is introduced by a comment with its name and a one-line
    /// description.
    pub fn render_preamble(&self) -> String {
        let mut out = String::new();
        for tool in &self.tools {
            let description = tool.description.replace('\n', " ");
            out.push_str(&format!(
                "# {}\n# {}\n{}\n\n",
                tool.name,
                description.trim(),
                tool.source.trim_end()
            ));
        }
        out
    }

    /// `code` with the tool preamble in front of it.
    pub fn wrap_program(&self, code: &str) -> String {
        let mut program = self.render_preamble();
        program.push_str(code);
        program
    }
}
