//! The elaborated design: all specialized modules plus the top.

use crate::arena::Arena;
use crate::ids::ModuleId;
use crate::module::Module;
use plexus_common::{ContentHash, Ident};
use serde::{Deserialize, Serialize};

/// One entry of the specialization record: which source module, under which
/// parameter-tuple hash, produced which elaborated module.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Specialization {
    /// The source module name.
    pub source: Ident,
    /// Hash of the ordered, resolved parameter values.
    pub param_hash: ContentHash,
    /// The elaborated module.
    pub module: ModuleId,
}

/// The output of elaboration.
///
/// Each module is a specialization: fully unrolled, constant-folded, with
/// every parameter resolved. The specialization record is kept in insertion
/// order; the elaborator maintains its own hash-keyed view while running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// All elaborated modules.
    pub modules: Arena<ModuleId, Module>,
    /// The top module, if one was elaborated.
    pub top: Option<ModuleId>,
    /// The specialization record, in creation order.
    pub specializations: Vec<Specialization>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every symbol-table index after deserialization.
    pub fn rebuild_indexes(&mut self) {
        for (_, module) in self.modules.iter_mut() {
            module.ports.rebuild_index();
            module.params.rebuild_index();
            module.scope.rebuild_indexes();
        }
    }
}
