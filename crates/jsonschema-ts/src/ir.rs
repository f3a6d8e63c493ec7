//! Intermediate representation for resolved types.
//!
//! Every node lives in a [`TypeArena`] and children are held as [`TypeId`]s.
//! A declaration reached through several `$ref`s is the same node, and a name
//! assigned after the node was embedded in its parents is seen by all of them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Index, IndexMut};

/// Handle to a node in a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(usize);

/// A resolved type plus the metadata shared by all variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub ty: Type,
    /// Declared name. Set once the node is (or will be) emitted as its own declaration.
    pub id: Option<String>,
    /// Free text, rendered as a leading comment.
    pub description: Option<String>,
}

/// The shape of a resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// Catch-all for anything unconstrained or unresolvable.
    Any,
    Primitive(Primitive),
    /// A JSON scalar used as a type (`"a"`, `1`, `true`).
    Literal(Value),
    /// Homogeneous array of the element type.
    Array(TypeId),
    /// From `anyOf` or a multi-valued `type`.
    Union(Vec<TypeId>),
    /// From `allOf`.
    Intersection(Vec<TypeId>),
    /// Name of a declaration resolved elsewhere.
    Reference(String),
    /// Enum with explicitly named members; the enum's name is the node's `id`.
    NamedEnum(Vec<EnumValue>),
    /// Object with named properties, in declaration order.
    Interface(Vec<Property>),
}

/// Primitive kinds, one per JSON Schema `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
    Object,
}

/// A member of a named enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Declared constant name (from `tsEnumNames`).
    pub identifier: String,
    /// The literal it stands for (from `enum`).
    pub value: Value,
}

/// A property of an interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub ty: TypeId,
}

impl Node {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            id: None,
            description: None,
        }
    }

    /// Simple types need no block comment and are inlined rather than declared
    /// when reached through a `$ref` (unless every reference is declared).
    pub fn is_simple(&self) -> bool {
        match &self.ty {
            Type::NamedEnum(_) | Type::Interface(_) => false,
            Type::Union(members) | Type::Intersection(members) => members.len() <= 1,
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.ty, Type::Primitive(Primitive::Null))
    }
}

/// Owner of every node built during one compile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeArena {
    nodes: Vec<Node>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, ty: Type) -> TypeId {
        self.nodes.push(Node::new(ty));
        TypeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: TypeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<TypeId> for TypeArena {
    type Output = Node;

    fn index(&self, id: TypeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<TypeId> for TypeArena {
    fn index_mut(&mut self, id: TypeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
