//! TypeScript declaration output.
//!
//! Every node renders either inline (as the type of a property or element) or
//! as a standalone declaration. A node with an id is always inlined by name.

use crate::ir::{EnumValue, Node, Primitive, Type, TypeArena, TypeId};
use crate::settings::Settings;
use crate::store::DeclarationStore;
use serde_json::Value;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders nodes of one arena under one set of settings.
pub struct TypeScriptRenderer<'a> {
    arena: &'a TypeArena,
    settings: &'a Settings,
}

impl<'a> TypeScriptRenderer<'a> {
    pub fn new(arena: &'a TypeArena, settings: &'a Settings) -> Self {
        Self { arena, settings }
    }

    /// All declarations of `store`, enums first, separated by newlines.
    pub fn render_store(&self, store: &DeclarationStore) -> String {
        store
            .emission_order(self.arena)
            .into_iter()
            .map(|node| self.declaration(node))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Standalone declaration of `node`, preceded by its block comment.
    pub fn declaration(&self, node: TypeId) -> String {
        let n = &self.arena[node];
        let name = n.id.as_deref().map(safe_identifier).unwrap_or_default();
        let mut out = self.block_comment(n);

        match &n.ty {
            Type::NamedEnum(values) => {
                let keyword = if self.settings.use_const_enums {
                    "const enum"
                } else {
                    "enum"
                };
                let members = values
                    .iter()
                    .map(enum_member)
                    .collect::<Vec<_>>()
                    .join(&format!(",\n{INDENT}"));
                write!(out, "export {keyword} {name} {{\n{INDENT}{members}\n}}").unwrap();
            }
            Type::Interface(_) => {
                write!(out, "export interface {name} {}", self.body(n)).unwrap();
            }
            _ => {
                write!(out, "export type {name} = {}", self.body(n)).unwrap();
                if self.settings.end_type_with_semicolon {
                    out.push(';');
                }
            }
        }
        out
    }

    /// How `node` is written where another type uses it.
    pub fn inline(&self, node: TypeId) -> String {
        let n = &self.arena[node];
        match &n.id {
            Some(id) => safe_identifier(id),
            None => self.body(n),
        }
    }

    fn body(&self, n: &Node) -> String {
        match &n.ty {
            Type::Any => "any".to_string(),
            Type::Primitive(primitive) => primitive_name(*primitive).to_string(),
            Type::Literal(value) => value.to_string(),
            Type::Reference(name) => name.clone(),
            Type::NamedEnum(_) => n.id.as_deref().map(safe_identifier).unwrap_or_default(),
            Type::Array(element) => {
                let element = self.inline(*element);
                if element.contains('|') || element.contains('&') {
                    format!("({element})[]")
                } else {
                    format!("{element}[]")
                }
            }
            Type::Union(members) => self.join(members.iter().copied(), " | "),
            Type::Intersection(members) => self.join(
                members.iter().copied().filter(|m| !self.arena[*m].is_null()),
                " & ",
            ),
            Type::Interface(properties) => {
                let mut out = String::from("{\n");
                let lines = properties
                    .iter()
                    .map(|property| {
                        let mut line = String::from(INDENT);
                        if let Some(description) = &self.arena[property.ty].description {
                            line.push_str(&comment_lines(description).join(&format!("\n{INDENT}")));
                            line.push('\n');
                            line.push_str(INDENT);
                        }
                        let ty = self.inline(property.ty).replace('\n', &format!("\n{INDENT}"));
                        let optional = if property.required { "" } else { "?" };
                        write!(line, "{}{optional}: {ty}", property.name).unwrap();
                        if self.settings.end_property_with_semicolon {
                            line.push(';');
                        }
                        line
                    })
                    .collect::<Vec<_>>();
                out.push_str(&lines.join("\n"));
                out.push_str("\n}");
                out
            }
        }
    }

    fn join(&self, members: impl Iterator<Item = TypeId>, separator: &str) -> String {
        members
            .map(|member| self.inline(member))
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn block_comment(&self, n: &Node) -> String {
        match &n.description {
            Some(description) if !n.is_simple() => {
                let mut out = comment_lines(description).join("\n");
                out.push('\n');
                out
            }
            _ => String::new(),
        }
    }
}

fn primitive_name(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "string",
        Primitive::Number => "number",
        Primitive::Boolean => "boolean",
        Primitive::Null => "null",
        Primitive::Object => "Object",
    }
}

/// `Name = value`, or just `Name` when the value is null or empty.
fn enum_member(member: &EnumValue) -> String {
    match &member.value {
        Value::Null => member.identifier.clone(),
        Value::String(s) if s.is_empty() => member.identifier.clone(),
        value => format!("{} = {value}", member.identifier),
    }
}

fn comment_lines(text: &str) -> Vec<String> {
    let mut lines = vec!["/**".to_string()];
    lines.extend(text.split('\n').map(|line| format!(" * {line}")));
    lines.push(" */".to_string());
    lines
}

/// Turn a declared name into a PascalCase type name.
///
/// Words are split on anything that is not a letter or digit, on lower-to-upper
/// case changes and on digit-to-letter changes, then capitalized and joined.
///
/// - `foo` → `Foo`
/// - `foo_bar` → `FooBar`
/// - `definitions/diskDevice` → `DefinitionsDiskDevice`
pub fn safe_identifier(name: &str) -> String {
    // Runs of single letters (`a.b.c`) read as one word so the result re-derives to itself.
    let mut merged: Vec<String> = Vec::new();
    let mut letters = String::new();
    for word in words(name) {
        if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
            letters.push_str(&word);
            continue;
        }
        if !letters.is_empty() {
            merged.push(std::mem::take(&mut letters));
        }
        merged.push(word);
    }
    if !letters.is_empty() {
        merged.push(letters);
    }

    merged
        .iter()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_ascii_digit() && c.is_alphabetic())
                // Last capital of an acronym starts the next word: `XMLHttp` → `XML`, `Http`.
                || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
