//! Structured run logging.
//!
//! Provides [`JsonlRunLogger`], a JSONL transcript writer that implements
//! the [`RunLogger`](marshall_application::RunLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlRunLogger;
