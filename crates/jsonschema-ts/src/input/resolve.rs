//! `$ref` resolution.
//!
//! Local pointers (`#/definitions/foo`) are looked up in the document that
//! contains them and registered under their path, so every later reference to
//! the same path reuses the node. Anything else is a file path, resolved
//! against the referencing document's directory, loaded once, and referenced
//! by name whenever it gets its own declaration.
//!
//! A key reached again while its own resolution is still running becomes a
//! forward [`Type::Reference`], and the target is declared once it is built.

use super::compiler::{Compiler, Frame, ROOT_KEY, str_field};
use super::loader::{is_remote, normalize_path};
use crate::error::CompileError;
use crate::ir::{Type, TypeId};
use crate::output::typescript::safe_identifier;
use serde_json::Value;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

impl Compiler {
    pub(crate) fn resolve_ref(
        &mut self,
        reference: &str,
        property: Option<&str>,
    ) -> Result<TypeId, CompileError> {
        if reference == "#" || reference == "#/" {
            return Ok(self.reference_document_root());
        }
        match reference.strip_prefix('#') {
            Some(pointer) => self.resolve_pointer(pointer.strip_prefix('/').unwrap_or(pointer)),
            None => self.resolve_file(reference, property),
        }
    }

    fn frame(&self) -> &Frame {
        self.frames
            .last()
            .expect("a document frame is pushed for the whole compile")
    }

    /// `#` names the current document's own declaration.
    fn reference_document_root(&mut self) -> TypeId {
        let frame = self.frame();
        let name = frame.name.clone();
        let key = frame.key.clone().unwrap_or_else(|| ROOT_KEY.to_string());
        self.forward_reference(key, &name)
    }

    /// A reference to the declaration `key` will become, named `name` for now.
    fn forward_reference(&mut self, key: String, name: &str) -> TypeId {
        let reference = self.arena.alloc(Type::Reference(safe_identifier(name)));
        self.forward.entry(key.clone()).or_default().push(reference);
        self.forced.insert(key);
        reference
    }

    fn resolve_pointer(&mut self, pointer: &str) -> Result<TypeId, CompileError> {
        let frame = self.frame();
        let document = Rc::clone(&frame.document);
        let key = match &frame.key {
            Some(file) => format!("{file}#/{pointer}"),
            None => pointer.to_string(),
        };
        if let Some(existing) = self.store.get(&key) {
            return Ok(existing);
        }

        let segments: Vec<&str> = pointer.split('/').collect();
        let name = if self.settings.use_full_reference_path_as_name {
            pointer.to_string()
        } else {
            segments.last().copied().unwrap_or_default().to_string()
        };

        if self.pending.contains(&key) {
            warn!(%key, "reference cycle; emitting a forward reference");
            return Ok(self.forward_reference(key, &name));
        }

        let Some(target) = lookup(&document, &segments) else {
            warn!(%key, "unresolvable reference; using `any`");
            return Ok(self.arena.alloc(Type::Any));
        };

        self.pending.insert(key.clone());
        let resolved = self.resolve_type(target, None, false);
        self.pending.remove(&key);
        let node = resolved?;

        let forced = self.forced.remove(&key);
        if forced || self.settings.declare_referenced || !self.arena[node].is_simple() {
            self.declare(key, node, name);
        }
        Ok(node)
    }

    fn resolve_file(&mut self, reference: &str, property: Option<&str>) -> Result<TypeId, CompileError> {
        if is_remote(reference) {
            return Err(CompileError::RemoteReference {
                reference: reference.to_string(),
            });
        }
        let path = normalize_path(&self.frame().dir.join(reference));

        if let Some(&loaded) = self.files.get(&path) {
            return Ok(loaded);
        }
        let key = path.display().to_string();
        if let Some(frame) = self.frames.iter().find(|f| f.key.as_deref() == Some(key.as_str())) {
            warn!(%key, "reference cycle between files; emitting a forward reference");
            let name = frame.name.clone();
            return Ok(self.forward_reference(key, &name));
        }

        let text = self
            .loader
            .read(&path)
            .map_err(|source| CompileError::MissingReference {
                path: path.clone(),
                source,
            })?;
        let document: Value =
            serde_json::from_str(&text).map_err(|source| CompileError::MalformedReference {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "loaded referenced schema");

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let document = Rc::new(document);
        self.frames.push(Frame {
            document: Rc::clone(&document),
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            key: Some(key.clone()),
            name: str_field(&document, "title")
                .or_else(|| str_field(&document, "id"))
                .unwrap_or(&stem)
                .to_string(),
        });
        let resolved = self.resolve_type(&document, property, true);
        self.frames.pop();
        let node = resolved?;

        let forced = self.forced.remove(&key);
        let loaded = if forced || self.settings.declare_referenced || !self.arena[node].is_simple() {
            let name = safe_identifier(self.arena[node].id.as_deref().unwrap_or(&stem));
            self.declare(key, node, name.clone());
            self.arena.alloc(Type::Reference(name))
        } else {
            // Inlined, so the document title must not print as a name.
            if !self.store.is_declared(node) {
                self.arena[node].id = None;
            }
            node
        };
        self.files.insert(path, loaded);
        Ok(loaded)
    }
}

/// Walk `segments` from the document root through object keys and array indices.
fn lookup<'a>(document: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments.iter().try_fold(document, |value, segment| match value {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
