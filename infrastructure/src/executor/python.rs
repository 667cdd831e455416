//! Python code executor
//!
//! Runs a generated program in a fresh interpreter process. The program
//! text is fed on stdin to a small driver that executes it in an isolated
//! namespace, captures its stdout and reports the `result` variable as a
//! JSON line behind [`RESULT_MARKER`].

use crate::config::FileExecutorConfig;
use async_trait::async_trait;
use marshall_application::ports::code_executor::{CodeExecutor, ExecutionOutput, ExecutorError};
use marshall_domain::core::string::truncate;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Prefix of the line carrying the serialized `result`
pub const RESULT_MARKER: &str = "__MARSHALL_RESULT__:";

const DRIVER: &str = r#"
import contextlib, io, json, sys
_source = sys.stdin.read()
_namespace = {"__name__": "__main__"}
_captured = io.StringIO()
with contextlib.redirect_stdout(_captured):
    exec(compile(_source, "<program>", "exec"), _namespace)
sys.stdout.write(_captured.getvalue())
_report = {"result": _namespace["result"]} if "result" in _namespace else {}
sys.stdout.write("\n" + "__MARSHALL_RESULT__:" + json.dumps(_report, default=str) + "\n")
"#;

/// Executes programs with a local Python interpreter.
pub struct PythonExecutor {
    python: String,
    timeout: Duration,
    max_output_bytes: usize,
}

impl PythonExecutor {
    pub fn new(python: impl Into<String>) -> Self {
        let defaults = FileExecutorConfig::default();
        Self {
            python: python.into(),
            timeout: Duration::from_secs(defaults.timeout_secs),
            max_output_bytes: defaults.max_output_bytes,
        }
    }

    pub fn from_config(config: &FileExecutorConfig) -> Self {
        Self::new(config.python.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_max_output_bytes(config.max_output_bytes)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }

    async fn run(&self, source: &str) -> Result<std::process::Output, ExecutorError> {
        let mut child = Command::new(&self.python)
            .args(["-c", DRIVER])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutorError::SpawnFailed(format!("{}: {}", self.python, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .await
                .map_err(|e| ExecutorError::SpawnFailed(format!("writing program: {}", e)))?;
        }

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output.map_err(|e| ExecutorError::SpawnFailed(e.to_string())),
            Err(_) => {
                warn!("Program timed out after {:?}", self.timeout);
                Err(ExecutorError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}

/// Last line of a Python traceback, e.g. `ZeroDivisionError: division by zero`.
fn error_summary(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("process exited with an error")
        .to_string()
}

/// Split driver stdout into the program's own output and its result.
pub(crate) fn parse_output(stdout: &str, max_output_bytes: usize) -> Result<ExecutionOutput, ExecutorError> {
    let Some(pos) = stdout.rfind(RESULT_MARKER) else {
        return Err(ExecutorError::InvalidOutput(
            "result marker missing from interpreter output".to_string(),
        ));
    };

    let report = stdout[pos + RESULT_MARKER.len()..].trim();
    let mut output: ExecutionOutput =
        serde_json::from_str(report).map_err(|e| ExecutorError::InvalidOutput(e.to_string()))?;

    let printed = stdout[..pos].strip_suffix('\n').unwrap_or(&stdout[..pos]);
    output.stdout = truncate(printed, max_output_bytes);
    Ok(output)
}

#[async_trait]
impl CodeExecutor for PythonExecutor {
    async fn execute(&self, source: &str) -> Result<ExecutionOutput, ExecutorError> {
        debug!("Executing {} bytes of Python", source.len());
        let output = self.run(source).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExecutorError::ProgramFailed(error_summary(&stderr)));
        }

        parse_output(&stdout, self.max_output_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    #[test]
    fn test_parse_result_and_stdout() {
        let stdout = format!("hello\n\n{}{{\"result\": 42}}\n", RESULT_MARKER);
        let output = parse_output(&stdout, 1024).unwrap();
        assert_eq!(output.result, Some(json!(42)));
        assert_eq!(output.stdout, "hello\n");
    }

    #[test]
    fn test_parse_missing_result() {
        let stdout = format!("\n{}{{}}\n", RESULT_MARKER);
        let output = parse_output(&stdout, 1024).unwrap();
        assert!(!output.produced());
        assert_eq!(output.stdout, "");
    }

    #[test]
    fn test_parse_truncates_stdout() {
        let stdout = format!("{}\n{}{{}}\n", "x".repeat(100), RESULT_MARKER);
        let output = parse_output(&stdout, 10).unwrap();
        assert_eq!(output.stdout, "xxxxxxx...");
    }

    #[test]
    fn test_parse_without_marker() {
        assert!(matches!(
            parse_output("Segmentation fault", 1024),
            Err(ExecutorError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_error_summary_takes_last_line() {
        let stderr = "Traceback (most recent call last):\n  File \"<program>\", line 1\nZeroDivisionError: division by zero\n";
        assert_eq!(error_summary(stderr), "ZeroDivisionError: division by zero");
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let executor = PythonExecutor::new("/nonexistent/python-binary");
        assert!(matches!(
            executor.execute("result = 1").await,
            Err(ExecutorError::SpawnFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_executes_program() {
        if !python_available() {
            return;
        }
        let executor = PythonExecutor::new("python3");
        let output = executor
            .execute("print('working')\nresult = sum(range(10))")
            .await
            .unwrap();
        assert_eq!(output.result, Some(json!(45)));
        assert_eq!(output.stdout, "working\n");
    }

    #[tokio::test]
    async fn test_program_error() {
        if !python_available() {
            return;
        }
        let executor = PythonExecutor::new("python3");
        match executor.execute("result = 1 / 0").await {
            Err(ExecutorError::ProgramFailed(msg)) => assert!(msg.contains("ZeroDivisionError")),
            other => panic!("expected ProgramFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        if !python_available() {
            return;
        }
        let executor = PythonExecutor::new("python3").with_timeout(Duration::from_millis(200));
        assert!(matches!(
            executor.execute("import time\ntime.sleep(5)").await,
            Err(ExecutorError::Timeout(_))
        ));
    }
}
