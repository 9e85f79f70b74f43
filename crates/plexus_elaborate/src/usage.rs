//! Read/write usage index over an elaborated module.
//!
//! Built once after a module leaves the worklist, the index answers "who
//! reads this variable" and "who writes it" without rescanning the scope
//! tree. Sites are `(block, statement position)` pairs; a statement that
//! both reads and writes a variable appears in both lists.

use std::collections::HashMap;

use plexus_common::Ident;
use plexus_ir::{BlockId, Module, Stmt};

/// One statement referencing a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSite {
    /// The block the statement lives in.
    pub block: BlockId,
    /// The statement's position in the block's list.
    pub stmt_index: usize,
}

/// Read and write sites for every variable of a module.
#[derive(Debug, Default)]
pub struct UsageIndex {
    readers: HashMap<Ident, Vec<UsageSite>>,
    writers: HashMap<Ident, Vec<UsageSite>>,
}

impl UsageIndex {
    /// Scans the module's reachable blocks and builds the index.
    pub fn build(module: &Module) -> Self {
        let mut index = Self::default();
        let mut blocks = Vec::new();
        module
            .scope
            .visit_reachable(module.root, &mut |id| blocks.push(id));

        for block in blocks {
            for (stmt_index, stmt) in module.scope.block(block).stmts.iter().enumerate() {
                let site = UsageSite { block, stmt_index };
                if let Stmt::Assign(assign) = stmt {
                    index.writers.entry(assign.target.name).or_default().push(site);
                }
                stmt.for_each_expr(&mut |expr| {
                    expr.for_each_var(&mut |var| {
                        index.readers.entry(var.name).or_default().push(site);
                    });
                });
            }
        }
        for sites in index.readers.values_mut() {
            sites.dedup();
        }
        index
    }

    /// Statements reading the variable.
    pub fn readers(&self, name: Ident) -> &[UsageSite] {
        self.readers.get(&name).map_or(&[], Vec::as_slice)
    }

    /// Statements writing the variable.
    pub fn writers(&self, name: Ident) -> &[UsageSite] {
        self.writers.get(&name).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the variable is never read.
    pub fn is_unread(&self, name: Ident) -> bool {
        self.readers(name).is_empty()
    }

    /// Returns `true` if the variable is never written.
    pub fn is_undriven(&self, name: Ident) -> bool {
        self.writers(name).is_empty()
    }
}
