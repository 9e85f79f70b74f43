//! Function declarations.

use crate::ids::BlockId;
use crate::symbol::Symbol;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};

/// A function declaration.
///
/// The body is a block in the owning module's scope tree; a variable named
/// after the function inside the body carries the return value. Calls stay
/// residual through elaboration, so the body is classified like any other
/// scope but never inlined here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    /// The function's name.
    pub name: Ident,
    /// Argument names in declaration order.
    pub args: Vec<Ident>,
    /// The body scope.
    pub body: BlockId,
    /// Source location of the declaration.
    pub span: Span,
}

impl Symbol for Function {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}
