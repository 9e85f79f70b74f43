//! Module definitions: ports, parameters, and the owning scope tree.

use crate::block::ScopeTree;
use crate::expr::Expression;
use crate::ids::BlockId;
use crate::symbol::{Symbol, SymbolTable};
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};

/// The direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven from outside the module.
    Input,
    /// Driven from inside the module.
    Output,
    /// Bidirectional.
    InOut,
}

/// A module port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// The port's name.
    pub name: Ident,
    /// The port's direction.
    pub direction: PortDirection,
    /// Bit width expression; `None` means a single bit.
    pub width: Option<Expression>,
    /// Source location of the declaration.
    pub span: Span,
}

impl Symbol for Port {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}

/// A module parameter with its default (or overridden) value.
///
/// During specialization the override value replaces `value`; by the time a
/// module leaves the worklist every parameter value is a valuable constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter's name.
    pub name: Ident,
    /// The current value expression.
    pub value: Expression,
    /// Source location of the declaration.
    pub span: Span,
}

impl Symbol for Parameter {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}

/// An elaborated (or in-elaboration) module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The module's elaborated name. The first specialization keeps the
    /// source name; later ones carry a numeric suffix.
    pub name: Ident,
    /// The name the module was declared with.
    pub source_name: Ident,
    /// Ports in declaration order.
    pub ports: SymbolTable<Port>,
    /// Parameters in declaration order.
    pub params: SymbolTable<Parameter>,
    /// All blocks of this module, root scope included.
    pub scope: ScopeTree,
    /// The module's root block.
    pub root: BlockId,
    /// Source location of the module header.
    pub span: Span,
}

impl Module {
    /// Creates a module with an empty root scope.
    pub fn new(name: Ident, span: Span) -> Self {
        let mut scope = ScopeTree::new();
        let root = scope.alloc_root();
        Self {
            name,
            source_name: name,
            ports: SymbolTable::new(),
            params: SymbolTable::new(),
            scope,
            root,
            span,
        }
    }
}

impl Symbol for Module {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}
