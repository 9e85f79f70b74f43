//! Variable declarations.

use crate::expr::Expression;
use crate::symbol::Symbol;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};

/// Whether a variable is a continuously driven net or a procedural reg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// A net (`wire`): continuously driven, may not hold state.
    Net,
    /// A reg: assigned procedurally, holds state.
    Reg,
}

/// A declared variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// The variable's name.
    pub name: Ident,
    /// Net or reg.
    pub kind: VarKind,
    /// Bit width expression; `None` means a single bit.
    pub width: Option<Expression>,
    /// Whether the variable is signed.
    pub signed: bool,
    /// Declaration-site initializer, if any.
    ///
    /// For nets this is desugared into a continuous assignment during
    /// classification; for regs it is a semantic error reported after
    /// constant folding.
    pub init: Option<Expression>,
    /// Source location of the declaration.
    pub span: Span,
}

impl Symbol for Variable {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}
