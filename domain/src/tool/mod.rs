//! Tools available to generated code
//!
//! A tool is a named function with a description and its source code. The
//! description block is shown to the model in its system instructions; the
//! source is prepended to every program the agent executes so the model's
//! code can call the tools directly.

pub mod toolkit;

pub use toolkit::{ToolDefinition, Toolkit};
