//! Compile JSON Schema documents into TypeScript declarations.
//!
//! A schema is classified fragment by fragment, lowered into an arena of
//! typed nodes, and printed as `export interface` / `export type` /
//! `export const enum` declarations.
//!
//! # Architecture
//!
//! ```text
//!  Input                     IR                     Output
//! ───────────────     ──────────────────     ─────────────────────
//! schema ──> classify ─> TypeArena (ir.rs) ──> TypeScriptRenderer
//!   │        (rule.rs)   DeclarationStore        (typescript.rs)
//!   └─ $ref ─> resolve.rs ─┘  (store.rs)
//!              loader.rs (other files)
//! ```
//!
//! # Example
//!
//! ```
//! use jsonschema_ts::{Settings, compile};
//!
//! let schema = serde_json::json!({
//!     "title": "User",
//!     "type": "object",
//!     "properties": {
//!         "id": { "type": "string" },
//!         "age": { "type": "integer" }
//!     },
//!     "required": ["id"],
//!     "additionalProperties": false
//! });
//!
//! let ts = compile(&schema, None, &Settings::default()).unwrap();
//! assert_eq!(ts, "export interface User {\n  id: string;\n  age?: number;\n}");
//! ```

pub mod error;
pub mod input;
pub mod ir;
pub mod output;
pub mod settings;
pub mod store;

pub use error::{CompileError, ErrorKind};
pub use input::{
    Compilation, Compiler, FsLoader, MemoryLoader, RuleKind, SchemaLoader, classify,
};
pub use output::{TypeScriptRenderer, safe_identifier};
pub use settings::Settings;

use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Compile `schema`, reading cross-file references from the file system.
///
/// `source_path` names the file the schema came from; relative `$ref`s are
/// resolved against its directory.
pub fn compile(
    schema: &Value,
    source_path: Option<&Path>,
    settings: &Settings,
) -> Result<String, CompileError> {
    Compiler::new(settings.clone()).compile(schema, source_path)
}

/// Like [`compile`], with cross-file references read through `loader`.
pub fn compile_with(
    loader: impl SchemaLoader + 'static,
    schema: &Value,
    source_path: Option<&Path>,
    settings: &Settings,
) -> Result<String, CompileError> {
    Compiler::new(settings.clone())
        .with_loader(loader)
        .compile(schema, source_path)
}

/// Read, parse and compile one schema file.
pub fn compile_from_file(path: &Path, settings: &Settings) -> Result<String, CompileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CompileError::ReadSchema {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Value = serde_json::from_str(&text).map_err(|source| CompileError::ParseSchema {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "generating TypeScript");
    compile(&schema, Some(path), settings)
}

/// Compile each file in order, joining the results with newlines.
///
/// Stops at the first failure; nothing from earlier files is returned then.
pub fn compile_from_files<P: AsRef<Path>>(
    paths: &[P],
    settings: &Settings,
) -> Result<String, CompileError> {
    let outputs = paths
        .iter()
        .map(|path| compile_from_file(path.as_ref(), settings))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(outputs.join("\n"))
}
