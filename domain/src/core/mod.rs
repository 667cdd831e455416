//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: model identifiers and provider inference
//! - [`task::Task`]: a validated instruction handed to one agent invocation
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod string;
pub mod task;
