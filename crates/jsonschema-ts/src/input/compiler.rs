//! Recursive descent from a schema document to the type model.

use super::loader::{FsLoader, SchemaLoader, normalize_path};
use super::rule::{RuleKind, classify, schema_type};
use crate::error::CompileError;
use crate::ir::{EnumValue, Primitive, Property, Type, TypeArena, TypeId};
use crate::output::typescript::{TypeScriptRenderer, safe_identifier};
use crate::settings::Settings;
use crate::store::DeclarationStore;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Top-level id used when the schema has no title or id and there is no source file.
const FALLBACK_ID: &str = "Interface1";

/// Store key standing for the root document when it has no source path.
pub(super) const ROOT_KEY: &str = "#";

/// Name of the index-signature property emitted for `additionalProperties`.
const INDEX_SIGNATURE: &str = "[k: string]";

/// Compiles one schema. Each compiler owns its stores and is consumed by the compile.
pub struct Compiler {
    pub(super) settings: Settings,
    pub(super) loader: Box<dyn SchemaLoader>,
    pub(super) arena: TypeArena,
    pub(super) store: DeclarationStore,
    /// Documents being compiled, innermost last. The root document is always at the bottom.
    pub(super) frames: Vec<Frame>,
    /// `$ref` keys whose resolution has started but not finished.
    pub(super) pending: HashSet<String>,
    /// Keys reached again while pending; they are declared whatever the settings say.
    pub(super) forced: HashSet<String>,
    /// Forward references handed out per key, renamed once every declaration is final.
    pub(super) forward: HashMap<String, Vec<TypeId>>,
    /// Cross-file references already loaded, with the node that stands for them.
    pub(super) files: HashMap<PathBuf, TypeId>,
}

/// A document on the resolution stack.
pub(super) struct Frame {
    pub(super) document: Rc<Value>,
    /// Directory that relative file references are resolved against.
    pub(super) dir: PathBuf,
    /// Store key of the file this document came from; `None` for a root without a source path.
    pub(super) key: Option<String>,
    /// Name the document's own declaration gets; target of `#`.
    pub(super) name: String,
}

/// Result of building the type model, before rendering.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub arena: TypeArena,
    pub store: DeclarationStore,
    pub settings: Settings,
    /// The node declared under the top-level id.
    pub root: TypeId,
    /// The top-level id.
    pub id: String,
}

impl Compilation {
    /// Render every stored declaration, enums first.
    pub fn render(&self) -> String {
        TypeScriptRenderer::new(&self.arena, &self.settings).render_store(&self.store)
    }
}

impl Compiler {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            loader: Box::new(FsLoader),
            arena: TypeArena::new(),
            store: DeclarationStore::new(),
            frames: Vec::new(),
            pending: HashSet::new(),
            forced: HashSet::new(),
            forward: HashMap::new(),
            files: HashMap::new(),
        }
    }

    /// Use `loader` for cross-file references instead of the file system.
    pub fn with_loader(mut self, loader: impl SchemaLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Compile `schema` to declaration text.
    ///
    /// `source_path` is the file the schema was read from; it names the top-level
    /// declaration when the schema has no title or id, and anchors relative `$ref`s.
    pub fn compile(self, schema: &Value, source_path: Option<&Path>) -> Result<String, CompileError> {
        Ok(self.build(schema, source_path)?.render())
    }

    /// Build the type model for `schema` without rendering it.
    pub fn build(
        mut self,
        schema: &Value,
        source_path: Option<&Path>,
    ) -> Result<Compilation, CompileError> {
        let id = str_field(schema, "title")
            .or_else(|| str_field(schema, "id"))
            .or_else(|| source_path.and_then(Path::file_stem).and_then(|s| s.to_str()))
            .unwrap_or(FALLBACK_ID)
            .to_string();
        let dir = source_path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let root_key = source_path.map(|path| normalize_path(path).display().to_string());

        let document = Rc::new(schema.clone());
        self.frames.push(Frame {
            document: Rc::clone(&document),
            dir,
            key: root_key.clone(),
            name: id.clone(),
        });
        let root = self.resolve_type(&document, None, true)?;
        self.frames.pop();
        self.declare(id.clone(), root, id.clone());
        self.bind_forward_references(root_key.as_deref().unwrap_or(ROOT_KEY), root);

        Ok(Compilation {
            arena: self.arena,
            store: self.store,
            settings: self.settings,
            root,
            id,
        })
    }

    /// Build the node for `fragment`, adopting its title as a declaration name.
    ///
    /// `is_reference` is set when the caller declares the node itself (the root
    /// document and cross-file targets), so a title names it without registering it.
    pub(crate) fn resolve_type(
        &mut self,
        fragment: &Value,
        property: Option<&str>,
        is_reference: bool,
    ) -> Result<TypeId, CompileError> {
        let node = self.build_type(fragment, property)?;

        if self.arena[node].id.is_none() {
            let adopted = str_field(fragment, "title").or_else(|| str_field(fragment, "id"));
            if let Some(id) = adopted {
                self.arena[node].id = Some(id.to_string());
                if !is_reference {
                    self.declare(id.to_string(), node, id.to_string());
                }
            }
        }
        if self.arena[node].description.is_none() {
            self.arena[node].description = str_field(fragment, "description").map(String::from);
        }
        Ok(node)
    }

    fn build_type(&mut self, fragment: &Value, property: Option<&str>) -> Result<TypeId, CompileError> {
        let kind = classify(fragment);
        trace!(?kind, property, "classified fragment");

        let ty = match kind {
            RuleKind::AnonymousSchema | RuleKind::NamedSchema => return self.build_interface(fragment),
            RuleKind::NamedEnum => return self.build_named_enum(fragment, property),
            RuleKind::Reference => {
                return match fragment.get("$ref") {
                    Some(Value::String(reference)) => self.resolve_ref(reference, property),
                    other => {
                        warn!(reference = ?other, "ignoring non-string $ref");
                        Ok(self.arena.alloc(Type::Any))
                    }
                };
            }
            RuleKind::Enum => {
                let values = fragment
                    .get("enum")
                    .and_then(Value::as_array)
                    .ok_or_else(|| CompileError::EnumNotArray {
                        rule: fragment.to_string(),
                    })?;
                let members = values
                    .iter()
                    .map(|value| self.arena.alloc(Type::Literal(value.clone())))
                    .collect();
                Type::Union(members)
            }
            RuleKind::TypedArray => match fragment.get("items") {
                Some(items) => Type::Array(self.resolve_type(items, None, false)?),
                None => Type::Array(self.arena.alloc(Type::Any)),
            },
            RuleKind::Array => Type::Array(self.arena.alloc(Type::Any)),
            RuleKind::AllOf => Type::Intersection(self.resolve_members(fragment, "allOf")?),
            RuleKind::AnyOf => Type::Union(self.resolve_members(fragment, "anyOf")?),
            RuleKind::Union => {
                let types = schema_type(fragment)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let mut members = Vec::with_capacity(types.len());
                for ty in types {
                    members.push(self.resolve_type(&json!({ "type": ty }), None, false)?);
                }
                Type::Union(members)
            }
            RuleKind::Boolean => Type::Primitive(Primitive::Boolean),
            RuleKind::Null => Type::Primitive(Primitive::Null),
            RuleKind::Number | RuleKind::NumberLiteral => Type::Primitive(Primitive::Number),
            RuleKind::Object => Type::Primitive(Primitive::Object),
            RuleKind::String => Type::Primitive(Primitive::String),
            RuleKind::Literal => Type::Literal(fragment.clone()),
            RuleKind::Any => Type::Any,
        };
        Ok(self.arena.alloc(ty))
    }

    fn resolve_members(&mut self, fragment: &Value, keyword: &str) -> Result<Vec<TypeId>, CompileError> {
        let schemas = fragment
            .get(keyword)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        schemas
            .iter()
            .map(|schema| self.resolve_type(schema, None, false))
            .collect()
    }

    /// Objects, read as if merged over
    /// `{ additionalProperties: true, properties: {}, required: [], type: "object" }`.
    fn build_interface(&mut self, schema: &Value) -> Result<TypeId, CompileError> {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut properties = Vec::new();
        if let Some(declared) = schema.get("properties").and_then(Value::as_object) {
            for (name, property_schema) in declared {
                let ty = self.resolve_type(property_schema, Some(name), false)?;
                properties.push(Property {
                    name: name.clone(),
                    required: required.contains(&name.as_str()),
                    ty,
                });
            }
        }

        let additional = schema.get("additionalProperties");
        // A property-less object with a default value and no say on additional
        // properties is read as `null`.
        if properties.is_empty() && additional.is_none() && schema.get("default").is_some() {
            return Ok(self.arena.alloc(Type::Primitive(Primitive::Null)));
        }

        let index_type = match additional {
            None | Some(Value::Bool(true)) if properties.is_empty() => {
                return Ok(self.arena.alloc(Type::Any));
            }
            None | Some(Value::Bool(true)) => Some(self.arena.alloc(Type::Any)),
            Some(schema @ Value::Object(_)) => Some(self.resolve_type(schema, None, false)?),
            Some(_) => None,
        };
        if let Some(ty) = index_type {
            properties.push(Property {
                name: INDEX_SIGNATURE.to_string(),
                required: true,
                ty,
            });
        }

        Ok(self.arena.alloc(Type::Interface(properties)))
    }

    fn build_named_enum(&mut self, rule: &Value, property: Option<&str>) -> Result<TypeId, CompileError> {
        let values = rule
            .get("enum")
            .and_then(Value::as_array)
            .ok_or_else(|| CompileError::EnumNotArray {
                rule: rule.to_string(),
            })?;
        let names = rule
            .get("tsEnumNames")
            .and_then(Value::as_array)
            .ok_or(CompileError::EnumNamesNotText)?;
        if names.len() != values.len() {
            return Err(CompileError::EnumLengthMismatch {
                rule: rule.to_string(),
            });
        }

        let members = names
            .iter()
            .zip(values)
            .map(|(name, value)| {
                let identifier = name.as_str().ok_or(CompileError::EnumNamesNotText)?;
                Ok(EnumValue {
                    identifier: identifier.to_string(),
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>, CompileError>>()?;

        let name = str_field(rule, "id")
            .or(property.filter(|p| !p.is_empty()))
            .map(String::from)
            .unwrap_or_else(|| format!("Enum{}", self.store.enum_count()));

        let node = self.arena.alloc(Type::NamedEnum(members));
        self.arena[node].id = Some(name.clone());
        if self.store.insert_enum(name.clone(), node).is_some() {
            warn!(%name, "named enum replaces an earlier enum with the same name");
        }
        Ok(node)
    }

    /// Point every forward reference at the final name of its target.
    ///
    /// A target can be renamed after the reference was made, e.g. when the
    /// root itself is a `$ref` and is declared under the top-level id.
    fn bind_forward_references(&mut self, root_key: &str, root: TypeId) {
        for (key, references) in std::mem::take(&mut self.forward) {
            let target = if key == root_key {
                Some(root)
            } else {
                self.store.get(&key)
            };
            let Some(name) = target.and_then(|t| self.arena[t].id.as_deref()) else {
                warn!(%key, "forward reference target was never declared");
                continue;
            };
            let name = safe_identifier(name);
            for reference in references {
                self.arena[reference].ty = Type::Reference(name.clone());
            }
        }
    }

    pub(super) fn declare(&mut self, key: String, node: TypeId, name: String) {
        debug!(%key, %name, "declaring type");
        if self.store.declare(&mut self.arena, key, node, name).is_some() {
            warn!("declaration replaces an earlier one under the same key");
        }
    }
}

pub(super) fn str_field<'a>(fragment: &'a Value, key: &str) -> Option<&'a str> {
    fragment.get(key).and_then(Value::as_str)
}
