//! Declaration bookkeeping for a single compile.

use crate::ir::{Type, TypeArena, TypeId};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Named declarations in insertion order, plus a separate store for named enums.
///
/// Keys are `$ref` paths (`definitions/diskDevice`), file paths, titles or the
/// top-level id. Several keys may point at the same node; it is emitted once.
/// Enums are emitted before everything else so later declarations can use them.
#[derive(Debug, Clone, Default)]
pub struct DeclarationStore {
    declarations: IndexMap<String, TypeId>,
    enums: IndexMap<String, TypeId>,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<TypeId> {
        self.declarations.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.declarations.contains_key(key)
    }

    /// Whether `node` is stored under any key or as a named enum.
    pub fn is_declared(&self, node: TypeId) -> bool {
        self.declarations.values().chain(self.enums.values()).any(|n| *n == node)
    }

    /// Register `node` under `key` and name it `name`.
    ///
    /// Returns the node previously stored under `key`, if it was a different one.
    pub fn declare(
        &mut self,
        arena: &mut TypeArena,
        key: String,
        node: TypeId,
        name: String,
    ) -> Option<TypeId> {
        arena[node].id = Some(name);
        self.declarations
            .insert(key, node)
            .filter(|previous| *previous != node)
    }

    /// Register a named enum. A second enum with the same name replaces the first in place.
    pub fn insert_enum(&mut self, name: String, node: TypeId) -> Option<TypeId> {
        self.enums.insert(name, node)
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn enums(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.enums.values().copied()
    }

    /// Nodes to emit as standalone declarations: enums first, then the rest,
    /// each node once, in first-insertion order.
    pub fn emission_order(&self, arena: &TypeArena) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let enums = self.enums.values().copied();
        let others = self
            .declarations
            .values()
            .copied()
            .filter(|node| !matches!(arena[*node].ty, Type::NamedEnum(_)));
        enums.chain(others).filter(|node| seen.insert(*node)).collect()
    }
}
