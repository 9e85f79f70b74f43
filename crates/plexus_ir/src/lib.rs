//! In-memory representation of a hardware design between parsing and
//! netlist construction.
//!
//! The IR is built around three ideas:
//!
//! - **Sum types for syntax.** Expressions and statements are enums whose
//!   variant shapes make malformed arity unrepresentable.
//! - **Arenas and side maps for structure.** Modules own their blocks in an
//!   append-only [`Arena`]; the parent relation is a side map, so no node
//!   holds a back pointer and deep copies stay cheap.
//! - **4-state constants.** [`Number`] carries X and Z alongside 0 and 1 in
//!   two packed bit planes, and every folding kernel lives on it.

#![warn(missing_docs)]

pub mod arena;
pub mod block;
pub mod design;
pub mod expr;
pub mod function;
pub mod ids;
pub mod instance;
pub mod module;
pub mod number;
pub mod stmt;
pub mod symbol;
pub mod variable;

pub use arena::{Arena, ArenaId};
pub use block::{Block, ScopeTree};
pub use design::{Design, Specialization};
pub use expr::{BinaryOp, Expression, Segment, Select, UnaryOp, VarRef};
pub use function::Function;
pub use ids::{BlockId, ModuleId};
pub use instance::{Connection, Instance, ParamOverride, PortConnection};
pub use module::{Module, Parameter, Port, PortDirection};
pub use number::{Number, NumberError, NATIVE_WIDTH};
pub use stmt::{Assign, AssignKind, CaseArm, CaseKind, ForAssign, Stmt};
pub use symbol::{Symbol, SymbolKind, SymbolTable};
pub use variable::{VarKind, Variable};
