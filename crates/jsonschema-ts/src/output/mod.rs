//! Rendering of the type model.

pub mod typescript;

pub use typescript::{TypeScriptRenderer, safe_identifier};
