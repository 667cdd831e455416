//! JSONL transcript writer for run events.
//!
//! Every [`RunEvent`] becomes one JSON line carrying `type`, `seq` and
//! `timestamp` next to the event payload.

use marshall_application::ports::run_logger::{RunEvent, RunLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Inner {
    writer: BufWriter<File>,
    seq: u64,
}

/// Run transcript logger, one JSON object per line.
///
/// Safe to share between tasks; lines are flushed as they are written.
pub struct JsonlRunLogger {
    inner: Mutex<Inner>,
    path: PathBuf,
}

impl JsonlRunLogger {
    /// Create (or truncate) the transcript at `path`, making parent
    /// directories as needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path, false)
    }

    /// Append to an existing transcript instead of truncating it.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path, true)
    }

    fn open(path: impl AsRef<Path>, append: bool) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_record(event: RunEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("seq".to_string(), Value::from(seq));
    map.insert("timestamp".to_string(), Value::from(timestamp));
    Value::Object(map)
}

impl RunLogger for JsonlRunLogger {
    fn log(&self, event: RunEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.seq += 1;
        let record = to_record(event, inner.seq);

        let written = serde_json::to_string(&record)
            .map_err(io::Error::other)
            .and_then(|line| {
                writeln!(inner.writer, "{}", line)?;
                inner.writer.flush()
            });
        if let Err(e) = written {
            warn!("Could not write transcript {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlRunLogger {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        let logger = JsonlRunLogger::create(&path).unwrap();

        logger.log(RunEvent::new(
            "decision",
            json!({"task": "What is 6*7?", "decision": "answer"}),
        ));
        logger.log(RunEvent::new("refined", json!({"answer": "42"})));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "decision");
        assert_eq!(records[0]["task"], "What is 6*7?");
        assert_eq!(records[0]["seq"], 1);
        assert_eq!(records[1]["seq"], 2);
        assert!(records[1]["timestamp"].is_string());
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.jsonl");
        let logger = JsonlRunLogger::create(&path).unwrap();
        logger.log(RunEvent::new("sample", json!("just a string")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "sample");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_append_keeps_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.jsonl");

        JsonlRunLogger::create(&path)
            .unwrap()
            .log(RunEvent::new("first", json!({})));
        JsonlRunLogger::append(&path)
            .unwrap()
            .log(RunEvent::new("second", json!({})));

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["type"], "second");
    }

    #[test]
    fn test_create_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlRunLogger::create(blocker.join("run.jsonl")).is_err());
    }
}
