//! Module instantiations: port connections and parameter overrides.

use crate::expr::{Expression, VarRef};
use crate::ids::ModuleId;
use crate::module::PortDirection;
use crate::symbol::Symbol;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};

/// What a port is connected to.
///
/// Bare variable references are distinguished from general expressions
/// because output and inout ports require a connectable target, and the
/// downstream graph stage wires them without an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Connection {
    /// A general expression, only valid on input ports.
    Expr(Expression),
    /// A direct variable reference.
    Variable(VarRef),
}

/// One port connection of an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConnection {
    /// The named port, or `None` for a positional connection.
    pub port: Option<Ident>,
    /// The port's direction, filled in once the target module is resolved.
    pub direction: Option<PortDirection>,
    /// The connected expression or variable; `None` leaves the port open.
    pub conn: Option<Connection>,
    /// Source location of the connection.
    pub span: Span,
}

/// One parameter override of an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamOverride {
    /// The named parameter, or `None` for a positional override.
    pub param: Option<Ident>,
    /// The override value.
    pub value: Expression,
    /// Source location of the override.
    pub span: Span,
}

/// A module instantiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// The instance's name.
    pub name: Ident,
    /// The source name of the instantiated module.
    pub target: Ident,
    /// The specialized module this instance resolved to, once elaborated.
    pub resolved: Option<ModuleId>,
    /// Port connections in source order.
    pub ports: Vec<PortConnection>,
    /// Parameter overrides in source order.
    pub params: Vec<ParamOverride>,
    /// Source location of the instantiation.
    pub span: Span,
}

impl Symbol for Instance {
    fn name(&self) -> Ident {
        self.name
    }

    fn set_name(&mut self, name: Ident) {
        self.name = name;
    }
}
