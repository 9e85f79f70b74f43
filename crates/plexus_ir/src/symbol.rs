//! Named-symbol kinds and insertion-ordered symbol tables.
//!
//! Every scope carries three [`SymbolTable`]s (variables, instances,
//! functions) and every module two more (ports, parameters). Insertion
//! order is significant: positional port and parameter binding follows
//! declaration order, so the table iterates in the order entries were
//! inserted regardless of later renames.

use plexus_common::Ident;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of named entity an identifier refers to.
///
/// Carried in diagnostics so that a collision message can say what kind of
/// thing a name was already bound to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SymbolKind {
    /// A named block (lexical scope).
    Block,
    /// A function.
    Function,
    /// A module definition.
    Module,
    /// A module instantiation.
    Instance,
    /// A module parameter.
    Parameter,
    /// A module port.
    Port,
    /// A variable (net or reg).
    Variable,
}

impl SymbolKind {
    /// Returns the lowercase noun used in diagnostics.
    pub fn noun(self) -> &'static str {
        match self {
            SymbolKind::Block => "block",
            SymbolKind::Function => "function",
            SymbolKind::Module => "module",
            SymbolKind::Instance => "instance",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Port => "port",
            SymbolKind::Variable => "variable",
        }
    }
}

/// A named entry that can live in a [`SymbolTable`].
pub trait Symbol {
    /// The name this entry is keyed by.
    fn name(&self) -> Ident;

    /// Rewrites the entry's name. The table re-indexes through
    /// [`SymbolTable::rename`]; calling this directly on a table entry
    /// desynchronizes the index.
    fn set_name(&mut self, name: Ident);
}

/// An insertion-ordered table of named entries with O(1) lookup.
///
/// Duplicate insertion is rejected (first declaration wins) and the
/// rejected entry is handed back so the caller can report its span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolTable<T: Symbol> {
    items: Vec<T>,
    #[serde(skip)]
    index: HashMap<Ident, usize>,
}

impl<T: Symbol> SymbolTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts an entry, keyed by its name.
    ///
    /// Returns the entry back as `Err` if the name is already taken.
    pub fn insert(&mut self, item: T) -> Result<(), T> {
        if self.index.contains_key(&item.name()) {
            return Err(item);
        }
        self.index.insert(item.name(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: Ident) -> Option<&T> {
        self.index.get(&name).map(|&i| &self.items[i])
    }

    /// Looks up an entry by name, mutably.
    pub fn get_mut(&mut self, name: Ident) -> Option<&mut T> {
        let i = *self.index.get(&name)?;
        Some(&mut self.items[i])
    }

    /// Returns `true` if the table contains an entry with the given name.
    pub fn contains(&self, name: Ident) -> bool {
        self.index.contains_key(&name)
    }

    /// Returns the declaration-order position of an entry.
    pub fn position(&self, name: Ident) -> Option<usize> {
        self.index.get(&name).copied()
    }

    /// Returns the entry at the given declaration-order position.
    pub fn at(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Iterates entries mutably in declaration order.
    ///
    /// Callers must not change entry names through this iterator; use
    /// [`rename`](Self::rename) instead.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Renames an entry, re-indexing the table.
    ///
    /// Returns `false` if `old` is absent or `new` is already taken.
    pub fn rename(&mut self, old: Ident, new: Ident) -> bool {
        if old == new {
            return true;
        }
        if self.index.contains_key(&new) {
            return false;
        }
        let Some(i) = self.index.remove(&old) else {
            return false;
        };
        self.items[i].set_name(new);
        self.index.insert(new, i);
        true
    }

    /// Removes all entries, returning them in declaration order.
    ///
    /// Used when a nested scope is flattened into its parent and the child
    /// tables are spliced upward.
    pub fn drain(&mut self) -> Vec<T> {
        self.index.clear();
        std::mem::take(&mut self.items)
    }

    /// Rebuilds the name index from the entries.
    ///
    /// The index is not serialized; deserialized tables call this before
    /// first lookup.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name(), i))
            .collect();
    }
}

impl<T: Symbol> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
