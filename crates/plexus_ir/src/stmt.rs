//! Statements and control flow.
//!
//! Control-flow bodies are [`BlockId`]s into the owning module's scope
//! tree, never inline statement lists: every lexical scope is a block, so
//! classification, flattening, and unrolling all operate on the same
//! representation.

use crate::expr::{Expression, Select, VarRef};
use crate::function::Function;
use crate::ids::BlockId;
use crate::instance::{Connection, Instance};
use crate::number::Number;
use crate::variable::Variable;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an assignment drives its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignKind {
    /// A continuous assignment (`assign`), driving a net.
    Continuous,
    /// A blocking procedural assignment (`=`).
    Blocking,
    /// A non-blocking procedural assignment (`<=`).
    NonBlocking,
}

/// An assignment statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assign {
    /// The assigned variable, with an optional bit or part select.
    pub target: VarRef,
    /// The assignment kind.
    pub kind: AssignKind,
    /// The driven expression.
    pub rhs: Expression,
    /// Source location.
    pub span: Span,
}

/// Which matching rule a case statement uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseKind {
    /// Exact 4-state match (`case`).
    Case,
    /// Z in either operand matches anything (`casez`).
    CaseZ,
    /// X or Z in either operand matches anything (`casex`).
    CaseX,
}

/// One arm of a case statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseArm {
    /// The patterns this arm matches, tried in order.
    pub patterns: Vec<Expression>,
    /// The arm's body.
    pub body: BlockId,
    /// Source location.
    pub span: Span,
}

/// The init or step assignment of a for loop (`i = <expr>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForAssign {
    /// The loop variable.
    pub var: Ident,
    /// The assigned expression.
    pub value: Expression,
    /// Source location.
    pub span: Span,
}

/// A statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// An assignment.
    Assign(Assign),
    /// A conditional.
    If {
        /// The condition.
        condition: Expression,
        /// The block executed when the condition is true.
        then_block: BlockId,
        /// The block executed otherwise, if present.
        else_block: Option<BlockId>,
        /// Source location.
        span: Span,
    },
    /// A case statement.
    Case {
        /// The matching rule.
        kind: CaseKind,
        /// The selector expression.
        selector: Expression,
        /// The arms, tried in order.
        arms: Vec<CaseArm>,
        /// The default body, if present.
        default: Option<BlockId>,
        /// Source location.
        span: Span,
    },
    /// A for loop.
    For {
        /// The init assignment.
        init: ForAssign,
        /// The continuation condition.
        condition: Expression,
        /// The step assignment.
        step: ForAssign,
        /// The loop body.
        body: BlockId,
        /// Source location.
        span: Span,
    },
    /// A while loop. Never unrolled; kept residual.
    While {
        /// The continuation condition.
        condition: Expression,
        /// The loop body.
        body: BlockId,
        /// Source location.
        span: Span,
    },
    /// A procedural function or task call.
    Call {
        /// The called name.
        name: Ident,
        /// The argument expressions.
        args: Vec<Expression>,
        /// Source location.
        span: Span,
    },
    /// A nested block.
    Block(BlockId),
    /// A variable declaration, hoisted into the scope's symbol table
    /// during classification.
    VarDecl(Variable),
    /// An instance declaration, hoisted during classification.
    InstanceDecl(Instance),
    /// A function declaration, hoisted during classification.
    FunctionDecl(Function),
}

impl Stmt {
    /// The source location of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign(a) => a.span,
            Stmt::If { span, .. }
            | Stmt::Case { span, .. }
            | Stmt::For { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Call { span, .. } => *span,
            Stmt::Block(_) => Span::DUMMY,
            Stmt::VarDecl(v) => v.span,
            Stmt::InstanceDecl(i) => i.span,
            Stmt::FunctionDecl(f) => f.span,
        }
    }

    /// Collects the blocks this statement directly references.
    pub fn child_blocks(&self, out: &mut Vec<BlockId>) {
        match self {
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                out.push(*then_block);
                if let Some(e) = else_block {
                    out.push(*e);
                }
            }
            Stmt::Case { arms, default, .. } => {
                for arm in arms {
                    out.push(arm.body);
                }
                if let Some(d) = default {
                    out.push(*d);
                }
            }
            Stmt::For { body, .. } | Stmt::While { body, .. } => out.push(*body),
            Stmt::Block(b) => out.push(*b),
            Stmt::FunctionDecl(f) => out.push(f.body),
            _ => {}
        }
    }

    /// Rewrites directly referenced block IDs according to the map.
    ///
    /// IDs absent from the map are left alone.
    pub fn remap_blocks(&mut self, map: &HashMap<BlockId, BlockId>) {
        let remap = |id: &mut BlockId| {
            if let Some(new) = map.get(id) {
                *id = *new;
            }
        };
        match self {
            Stmt::If {
                then_block,
                else_block,
                ..
            } => {
                remap(then_block);
                if let Some(e) = else_block {
                    remap(e);
                }
            }
            Stmt::Case { arms, default, .. } => {
                for arm in arms {
                    remap(&mut arm.body);
                }
                if let Some(d) = default {
                    remap(d);
                }
            }
            Stmt::For { body, .. } | Stmt::While { body, .. } => remap(body),
            Stmt::Block(b) => remap(b),
            Stmt::FunctionDecl(f) => remap(&mut f.body),
            _ => {}
        }
    }

    /// Visits every expression directly held by this statement,
    /// assignment-target selects included. Expressions inside child blocks
    /// are not visited; callers walk the scope tree for those.
    pub fn for_each_expr(&self, f: &mut impl FnMut(&Expression)) {
        fn visit_select(select: &Option<Select>, f: &mut impl FnMut(&Expression)) {
            match select {
                Some(Select::Bit(i)) => f(i),
                Some(Select::Part { msb, lsb }) => {
                    f(msb);
                    f(lsb);
                }
                None => {}
            }
        }

        match self {
            Stmt::Assign(a) => {
                visit_select(&a.target.select, f);
                f(&a.rhs);
            }
            Stmt::If { condition, .. } => f(condition),
            Stmt::Case { selector, arms, .. } => {
                f(selector);
                for arm in arms {
                    for pat in &arm.patterns {
                        f(pat);
                    }
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                ..
            } => {
                f(&init.value);
                f(condition);
                f(&step.value);
            }
            Stmt::While { condition, .. } => f(condition),
            Stmt::Call { args, .. } => {
                for a in args {
                    f(a);
                }
            }
            Stmt::Block(_) => {}
            Stmt::VarDecl(v) => {
                if let Some(w) = &v.width {
                    f(w);
                }
                if let Some(init) = &v.init {
                    f(init);
                }
            }
            Stmt::InstanceDecl(i) => {
                for pc in &i.ports {
                    match &pc.conn {
                        Some(Connection::Expr(e)) => f(e),
                        Some(Connection::Variable(v)) => visit_select(&v.select, f),
                        None => {}
                    }
                }
                for po in &i.params {
                    f(&po.value);
                }
            }
            Stmt::FunctionDecl(_) => {}
        }
    }

    /// The mutable counterpart of [`for_each_expr`](Self::for_each_expr).
    pub fn for_each_expr_mut(&mut self, f: &mut impl FnMut(&mut Expression)) {
        fn visit_select(select: &mut Option<Select>, f: &mut impl FnMut(&mut Expression)) {
            match select {
                Some(Select::Bit(i)) => f(i),
                Some(Select::Part { msb, lsb }) => {
                    f(msb);
                    f(lsb);
                }
                None => {}
            }
        }

        match self {
            Stmt::Assign(a) => {
                visit_select(&mut a.target.select, f);
                f(&mut a.rhs);
            }
            Stmt::If { condition, .. } => f(condition),
            Stmt::Case { selector, arms, .. } => {
                f(selector);
                for arm in arms {
                    for pat in &mut arm.patterns {
                        f(pat);
                    }
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                ..
            } => {
                f(&mut init.value);
                f(condition);
                f(&mut step.value);
            }
            Stmt::While { condition, .. } => f(condition),
            Stmt::Call { args, .. } => {
                for a in args {
                    f(a);
                }
            }
            Stmt::Block(_) => {}
            Stmt::VarDecl(v) => {
                if let Some(w) = &mut v.width {
                    f(w);
                }
                if let Some(init) = &mut v.init {
                    f(init);
                }
            }
            Stmt::InstanceDecl(i) => {
                for pc in &mut i.ports {
                    match &mut pc.conn {
                        Some(Connection::Expr(e)) => f(e),
                        Some(Connection::Variable(v)) => visit_select(&mut v.select, f),
                        None => {}
                    }
                }
                for po in &mut i.params {
                    f(&mut po.value);
                }
            }
            Stmt::FunctionDecl(_) => {}
        }
    }

    /// Substitutes a constant for a name in every expression of this
    /// statement and reduces the results.
    pub fn substitute(&mut self, name: Ident, value: &Number) {
        self.for_each_expr_mut(&mut |e| {
            let taken = std::mem::replace(e, Expression::Number(Number::zero(1)));
            *e = taken.substitute(name, value).reduce();
        });
    }

    /// Reduces every expression of this statement.
    pub fn reduce_exprs(&mut self) {
        self.for_each_expr_mut(&mut |e| {
            let taken = std::mem::replace(e, Expression::Number(Number::zero(1)));
            *e = taken.reduce();
        });
    }

    /// Rewrites variable names according to the map: references inside
    /// expressions, assignment targets, and called function names.
    pub fn rename_vars(&mut self, map: &HashMap<Ident, Ident>) {
        if let Stmt::Assign(a) = self {
            if let Some(new) = map.get(&a.target.name) {
                a.target.name = *new;
            }
        }
        if let Stmt::Call { name, .. } = self {
            if let Some(new) = map.get(name) {
                *name = *new;
            }
        }
        self.for_each_expr_mut(&mut |e| e.rename_vars(map));
    }
}
