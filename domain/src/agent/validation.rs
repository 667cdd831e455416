//! Configuration issues.
//!
//! Config loading never fails on a questionable value; instead every check
//! produces a [`ConfigIssue`] with a severity, and the binary decides
//! whether to warn or abort.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A model field is set to an empty string.
    EmptyModelName { field: String },
    /// An enum-like string field holds an unknown value.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A count that must be positive is zero.
    ZeroCount { field: String },
    /// The chosen reconcile strategy needs a capability that is not configured.
    MissingCapability { strategy: String, capability: String },
    /// A tool has neither inline source nor a source file.
    ToolWithoutSource { tool: String },
}

impl ConfigIssueCode {
    /// Dotted config key the issue is about, e.g. `ensemble.samples`.
    pub fn field(&self) -> &str {
        match self {
            ConfigIssueCode::EmptyModelName { field }
            | ConfigIssueCode::InvalidEnumValue { field, .. }
            | ConfigIssueCode::ZeroCount { field } => field,
            ConfigIssueCode::MissingCapability { .. } => "ensemble.strategy",
            ConfigIssueCode::ToolWithoutSource { .. } => "tools",
        }
    }
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_field() {
        let code = ConfigIssueCode::MissingCapability {
            strategy: "agent".into(),
            capability: "models.refiner".into(),
        };
        assert_eq!(code.field(), "ensemble.strategy");
        let code = ConfigIssueCode::ZeroCount {
            field: "agent.max_fan_out".into(),
        };
        assert_eq!(code.field(), "agent.max_fan_out");
    }

    #[test]
    fn test_constructors_set_severity() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::ZeroCount {
                field: "ensemble.samples".into(),
            },
            "ensemble.samples must be at least 1",
        );
        assert!(issue.is_error());

        let issue = ConfigIssue::warning(
            ConfigIssueCode::EmptyModelName {
                field: "models.refiner".into(),
            },
            "models.refiner is empty",
        );
        assert!(!issue.is_error());
    }
}
