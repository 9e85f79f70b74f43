//! Lexical scopes and the per-module scope tree.
//!
//! A module's blocks live in one append-only arena; the parent (father)
//! relation is a side map from child to parent instead of back pointers
//! inside the blocks. Name resolution walks the father chain outward and
//! stops at the module root; it never fabricates a declaration.

use crate::arena::Arena;
use crate::function::Function;
use crate::ids::BlockId;
use crate::instance::Instance;
use crate::stmt::Stmt;
use crate::symbol::SymbolTable;
use crate::variable::Variable;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One lexical scope: an ordered statement list plus the symbols declared
/// directly in it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    /// The block's label, if any. Unnamed blocks are flattened into their
    /// parent during classification; named blocks prefix their symbols.
    pub name: Option<Ident>,
    /// The statements, in source order.
    pub stmts: Vec<Stmt>,
    /// Variables declared in this scope.
    pub variables: SymbolTable<Variable>,
    /// Instances declared in this scope.
    pub instances: SymbolTable<Instance>,
    /// Functions declared in this scope.
    pub functions: SymbolTable<Function>,
    /// Source location of the block.
    pub span: Span,
}

impl Block {
    /// Creates an empty block.
    pub fn new(name: Option<Ident>, span: Span) -> Self {
        Self {
            name,
            span,
            ..Self::default()
        }
    }
}

/// A module's blocks and their parent relation.
///
/// The arena is append-only: blocks spliced away by flattening or branch
/// collapse simply become unreachable from the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeTree {
    blocks: Arena<BlockId, Block>,
    parents: HashMap<BlockId, BlockId>,
}

impl ScopeTree {
    /// Creates an empty scope tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a parentless block. Exactly one of these per module: the
    /// root scope.
    pub fn alloc_root(&mut self) -> BlockId {
        self.blocks.alloc(Block::default())
    }

    /// Allocates a block as a child of `parent`.
    pub fn alloc_child(&mut self, block: Block, parent: BlockId) -> BlockId {
        let id = self.blocks.alloc(block);
        self.parents.insert(id, parent);
        id
    }

    /// Returns the block with the given ID.
    pub fn block(&self, id: BlockId) -> &Block {
        self.blocks.get(id)
    }

    /// Returns the block with the given ID, mutably.
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        self.blocks.get_mut(id)
    }

    /// Returns the parent of a block, or `None` for the root.
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.parents.get(&id).copied()
    }

    /// Re-parents a block.
    pub fn set_parent(&mut self, child: BlockId, parent: BlockId) {
        self.parents.insert(child, parent);
    }

    /// The number of allocated blocks, unreachable ones included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no blocks are allocated.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Looks up a variable declared directly in the given block.
    pub fn find_var(&self, block: BlockId, name: Ident) -> Option<&Variable> {
        self.blocks.get(block).variables.get(name)
    }

    /// Resolves a variable by walking the father chain from `block` to the
    /// root. Returns the declaring block alongside the declaration.
    pub fn lookup_var(&self, block: BlockId, name: Ident) -> Option<(BlockId, &Variable)> {
        let mut current = Some(block);
        while let Some(id) = current {
            if let Some(var) = self.blocks.get(id).variables.get(name) {
                return Some((id, var));
            }
            current = self.parent(id);
        }
        None
    }

    /// Resolves a function by walking the father chain from `block` to the
    /// root.
    pub fn lookup_function(&self, block: BlockId, name: Ident) -> Option<&Function> {
        let mut current = Some(block);
        while let Some(id) = current {
            if let Some(func) = self.blocks.get(id).functions.get(name) {
                return Some(func);
            }
            current = self.parent(id);
        }
        None
    }

    /// Deep-copies the subtree rooted at `root` and returns the new root.
    ///
    /// Nested blocks referenced from statements and function bodies are
    /// cloned recursively and re-linked under their cloned parents. The
    /// new root has no parent; the caller re-parents it.
    pub fn clone_subtree(&mut self, root: BlockId) -> BlockId {
        let shallow = self.blocks.get(root).clone();
        let new_id = self.blocks.alloc(shallow);

        let mut children = Vec::new();
        for stmt in &self.blocks.get(new_id).stmts {
            stmt.child_blocks(&mut children);
        }
        for func in self.blocks.get(new_id).functions.iter() {
            children.push(func.body);
        }

        let mut map = HashMap::new();
        for child in children {
            if map.contains_key(&child) {
                continue;
            }
            let cloned = self.clone_subtree(child);
            self.parents.insert(cloned, new_id);
            map.insert(child, cloned);
        }

        let block = self.blocks.get_mut(new_id);
        for stmt in &mut block.stmts {
            stmt.remap_blocks(&map);
        }
        for func in block.functions.iter_mut() {
            if let Some(new_body) = map.get(&func.body) {
                func.body = *new_body;
            }
        }
        new_id
    }

    /// Visits every block reachable from `root`, depth-first, parents
    /// before children.
    pub fn visit_reachable(&self, root: BlockId, f: &mut impl FnMut(BlockId)) {
        f(root);
        let mut children = Vec::new();
        for stmt in &self.blocks.get(root).stmts {
            stmt.child_blocks(&mut children);
        }
        for func in self.blocks.get(root).functions.iter() {
            children.push(func.body);
        }
        for child in children {
            self.visit_reachable(child, f);
        }
    }

    /// Rebuilds the symbol-table name indexes of every block.
    ///
    /// Indexes are not serialized; deserialized trees call this before
    /// first lookup.
    pub fn rebuild_indexes(&mut self) {
        for (_, block) in self.blocks.iter_mut() {
            block.variables.rebuild_index();
            block.instances.rebuild_index();
            block.functions.rebuild_index();
        }
    }
}
