//! Code execution adapters

mod python;

pub use python::PythonExecutor;
