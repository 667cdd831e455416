//! Append-only log of completed directives.
//!
//! [`ResultLog`] is the memory of a decision agent run. Each completed
//! decision appends one `(directive, outcome)` entry; entries are never
//! removed or reordered. The rendered text is fed back to the model on
//! every later decision.
//!
//! # Text format
//!
//! ```text
//! Directive: compute the sum
//! Result: executed code:
//!   result = 1 + 2
//!   -> 3
//! --------
//! ```
//!
//! Multi-line fields are folded: every line after the first is indented by
//! two spaces. [`ResultLog::parse`] unfolds them, so rendering and parsing
//! recovers exactly the same entries for any field contents.

use serde::Serialize;
use thiserror::Error;

const DIRECTIVE_PREFIX: &str = "Directive: ";
const RESULT_PREFIX: &str = "Result: ";
const CONTINUATION: &str = "  ";
/// Line that closes every entry.
pub const ENTRY_SEPARATOR: &str = "--------";

/// One completed directive and what came of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub directive: String,
    pub outcome: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed result log at line {line}: {reason}")]
pub struct ResultLogParseError {
    pub line: usize,
    pub reason: &'static str,
}

/// Ordered, append-only record of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultLog {
    entries: Vec<LogEntry>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, directive: impl Into<String>, outcome: impl Into<String>) {
        self.entries.push(LogEntry {
            directive: directive.into(),
            outcome: outcome.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render every entry.
    pub fn render(&self) -> String {
        render_entries(&self.entries)
    }

    /// Render only the most recent `count` entries.
    pub fn render_recent(&self, count: usize) -> String {
        let start = self.entries.len().saturating_sub(count);
        render_entries(&self.entries[start..])
    }

    /// Recover a log from its rendered text.
    pub fn parse(text: &str) -> Result<Self, ResultLogParseError> {
        enum Field {
            None,
            Directive,
            Outcome,
        }

        let mut log = ResultLog::new();
        let mut directive = String::new();
        let mut outcome = String::new();
        let mut field = Field::None;

        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }

        for (index, line) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            match field {
                Field::None => {
                    let Some(rest) = line.strip_prefix(DIRECTIVE_PREFIX) else {
                        return Err(ResultLogParseError {
                            line: line_no,
                            reason: "expected 'Directive: '",
                        });
                    };
                    directive = rest.to_string();
                    field = Field::Directive;
                }
                Field::Directive => {
                    if let Some(rest) = line.strip_prefix(CONTINUATION) {
                        directive.push('\n');
                        directive.push_str(rest);
                    } else if let Some(rest) = line.strip_prefix(RESULT_PREFIX) {
                        outcome = rest.to_string();
                        field = Field::Outcome;
                    } else {
                        return Err(ResultLogParseError {
                            line: line_no,
                            reason: "expected continuation or 'Result: '",
                        });
                    }
                }
                Field::Outcome => {
                    if let Some(rest) = line.strip_prefix(CONTINUATION) {
                        outcome.push('\n');
                        outcome.push_str(rest);
                    } else if line == ENTRY_SEPARATOR {
                        log.push(
                            std::mem::take(&mut directive),
                            std::mem::take(&mut outcome),
                        );
                        field = Field::None;
                    } else {
                        return Err(ResultLogParseError {
                            line: line_no,
                            reason: "expected continuation or separator",
                        });
                    }
                }
            }
        }

        match field {
            Field::None => Ok(log),
            _ => Err(ResultLogParseError {
                line: text.split('\n').count(),
                reason: "unterminated entry",
            }),
        }
    }
}

fn render_entries(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(DIRECTIVE_PREFIX);
        out.push_str(&fold(&entry.directive));
        out.push('\n');
        out.push_str(RESULT_PREFIX);
        out.push_str(&fold(&entry.outcome));
        out.push('\n');
        out.push_str(ENTRY_SEPARATOR);
        out.push('\n');
    }
    out
}

fn fold(text: &str) -> String {
    text.replace('\n', "\n  ")
}
