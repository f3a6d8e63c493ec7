//! Schema input: classification, descent into the type model, and `$ref` loading.
//!
//! [`Compiler`] walks a schema document into a [`TypeArena`](crate::ir::TypeArena),
//! registering named nodes in a [`DeclarationStore`](crate::store::DeclarationStore).

mod compiler;
pub mod loader;
mod resolve;
pub mod rule;

pub use compiler::{Compilation, Compiler};
pub use loader::{FsLoader, MemoryLoader, SchemaLoader};
pub use rule::{RuleKind, classify};
