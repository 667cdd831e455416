//! Port for the structured run transcript.
//!
//! Defines the [`RunLogger`] trait for recording run events (decisions, code
//! executions, ensemble samples, selections) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured run event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Adapters add the timestamp.
#[derive(Debug, Clone)]
pub struct RunEvent {
    /// Event type identifier (e.g., "decision", "code_execution", "selection").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging run events.
///
/// `log` is synchronous and infallible; adapters swallow write failures so
/// a broken transcript never aborts a run.
pub trait RunLogger: Send + Sync {
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _event: RunEvent) {}
}
