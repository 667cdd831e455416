//! Tool loading
//!
//! Builds the [`Toolkit`](marshall_domain::Toolkit) injected into every
//! executed program from the `[[tools]]` config entries.

mod loader;

pub use loader::{ToolLoadError, load_toolkit};
