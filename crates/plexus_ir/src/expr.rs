//! Expression operator trees and the constant-folding reducer.
//!
//! An [`Expression`] exclusively owns its subtree. [`Expression::reduce`]
//! is the engine's partial evaluator: it consumes the tree and returns one
//! where every constant-foldable subtree has been replaced by its folded
//! [`Number`] and everything else is left as a minimal residual tree. An
//! expression that references unresolved variables never fails to reduce;
//! it simply stays residual until substitution makes it constant.
//!
//! Fold policy per operator class:
//! - bitwise, complement, reductions, case equality, and concatenation
//!   fold over any constant operands, propagating X/Z per 4-state rules;
//! - arithmetic, relational, logical, and shift operators require valuable
//!   operands (the shift amount specifically; the shifted value may carry
//!   X/Z) and otherwise remain residual.

use crate::number::Number;
use plexus_common::Ident;
use plexus_source::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Redundant unary plus (`+a`), collapsed away by reduction.
    Plus,
    /// Arithmetic negation (`-a`).
    Neg,
    /// Bitwise complement (`~a`).
    Not,
    /// Logical negation (`!a`).
    LogicNot,
    /// Reduction AND (`&a`).
    RedAnd,
    /// Reduction NAND (`~&a`).
    RedNand,
    /// Reduction OR (`|a`).
    RedOr,
    /// Reduction NOR (`~|a`).
    RedNor,
    /// Reduction XOR (`^a`).
    RedXor,
    /// Reduction XNOR (`~^a`).
    RedXnor,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Modulo (`%`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Bitwise XNOR (`~^`).
    Xnor,
    /// Left shift (`<<`).
    Shl,
    /// Logical right shift (`>>`).
    Shr,
    /// Arithmetic right shift (`>>>`).
    AShr,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
    /// Logical equality (`==`).
    Eq,
    /// Logical inequality (`!=`).
    Ne,
    /// Case equality (`===`), literal over X/Z.
    CaseEq,
    /// Case inequality (`!==`).
    CaseNe,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
}

/// A bit or part select on a variable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Select {
    /// A single-bit select (`v[i]`).
    Bit(Box<Expression>),
    /// A part select (`v[msb:lsb]`).
    Part {
        /// The most significant selected bit.
        msb: Box<Expression>,
        /// The least significant selected bit.
        lsb: Box<Expression>,
    },
}

impl Select {
    fn reduce(self) -> Self {
        match self {
            Select::Bit(i) => Select::Bit(Box::new(i.reduce())),
            Select::Part { msb, lsb } => Select::Part {
                msb: Box::new(msb.reduce()),
                lsb: Box::new(lsb.reduce()),
            },
        }
    }

    fn substitute(self, name: Ident, value: &Number) -> Self {
        match self {
            Select::Bit(i) => Select::Bit(Box::new(i.substitute(name, value))),
            Select::Part { msb, lsb } => Select::Part {
                msb: Box::new(msb.substitute(name, value)),
                lsb: Box::new(lsb.substitute(name, value)),
            },
        }
    }
}

/// A reference to a variable, with an optional bit or part select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarRef {
    /// The referenced name.
    pub name: Ident,
    /// An optional bit or part select.
    pub select: Option<Select>,
    /// Source location of the reference.
    pub span: Span,
}

/// One segment of a concatenation, optionally replicated (`{n{e}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// The replication count; `None` for a plain segment.
    pub repeat: Option<Box<Expression>>,
    /// The replicated or concatenated expression.
    pub expr: Expression,
}

/// An expression node.
///
/// Operator arity is enforced by the variant shape; a malformed arity is
/// unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    /// A constant 4-state value.
    Number(Number),
    /// A variable reference.
    Variable(VarRef),
    /// A concatenation of segments, most significant first.
    Concat {
        /// The segments, MSB first.
        segments: Vec<Segment>,
        /// Source location.
        span: Span,
    },
    /// A function call. Calls are never folded; they stay residual for the
    /// downstream graph stage.
    Call {
        /// The called function's name.
        name: Ident,
        /// The argument expressions.
        args: Vec<Expression>,
        /// Source location.
        span: Span,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        lhs: Box<Expression>,
        /// The right operand.
        rhs: Box<Expression>,
        /// Source location.
        span: Span,
    },
    /// A conditional (`cond ? a : b`).
    Ternary {
        /// The condition.
        cond: Box<Expression>,
        /// The value when the condition is true.
        then_expr: Box<Expression>,
        /// The value when the condition is false.
        else_expr: Box<Expression>,
        /// Source location.
        span: Span,
    },
}

impl Expression {
    /// A plain variable reference with no select.
    pub fn var(name: Ident, span: Span) -> Self {
        Expression::Variable(VarRef {
            name,
            select: None,
            span,
        })
    }

    /// Builds a unary node over an operand and reduces it once.
    pub fn unary(op: UnaryOp, operand: Expression, span: Span) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
            span,
        }
        .reduce()
    }

    /// Builds a binary node over two operands and reduces it once.
    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression, span: Span) -> Self {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }
        .reduce()
    }

    /// Builds a ternary node and reduces it once.
    pub fn ternary(cond: Expression, then_expr: Expression, else_expr: Expression, span: Span) -> Self {
        Expression::Ternary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span,
        }
        .reduce()
    }

    /// The source location of this node. Constants carry none.
    pub fn span(&self) -> Span {
        match self {
            Expression::Number(_) => Span::DUMMY,
            Expression::Variable(v) => v.span,
            Expression::Concat { span, .. }
            | Expression::Call { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Ternary { span, .. } => *span,
        }
    }

    /// Returns the constant value if this node is one.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expression::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns `true` iff the expression is a fully determined constant:
    /// a [`Number`] with no X/Z bit. Derived, not stored; reduction keeps
    /// it in sync with the tree.
    pub fn is_valuable(&self) -> bool {
        matches!(self, Expression::Number(n) if n.is_valuable())
    }

    /// Constant-folds this tree bottom-up and returns the result.
    ///
    /// Idempotent: reducing an already-reduced expression returns an
    /// identical tree.
    pub fn reduce(self) -> Expression {
        match self {
            Expression::Number(_) => self,
            Expression::Variable(v) => Expression::Variable(VarRef {
                select: v.select.map(Select::reduce),
                ..v
            }),
            Expression::Call { name, args, span } => Expression::Call {
                name,
                args: args.into_iter().map(Expression::reduce).collect(),
                span,
            },
            Expression::Concat { segments, span } => reduce_concat(segments, span),
            Expression::Unary { op, operand, span } => fold_unary(op, operand.reduce(), span),
            Expression::Binary { op, lhs, rhs, span } => {
                fold_binary(op, lhs.reduce(), rhs.reduce(), span)
            }
            Expression::Ternary {
                cond,
                then_expr,
                else_expr,
                span,
            } => {
                let cond = cond.reduce();
                match cond.as_number().and_then(Number::to_bool) {
                    Some(true) => then_expr.reduce(),
                    Some(false) => else_expr.reduce(),
                    // A constant X condition stays residual: no branch is
                    // selected and no bit-blend is attempted.
                    None => Expression::Ternary {
                        cond: Box::new(cond),
                        then_expr: Box::new(then_expr.reduce()),
                        else_expr: Box::new(else_expr.reduce()),
                        span,
                    },
                }
            }
        }
    }

    /// Replaces every reference to `name` with the given constant,
    /// applying constant bit and part selects to the substituted value.
    ///
    /// This is the loop-unrolling workhorse; callers reduce afterwards.
    pub fn substitute(self, name: Ident, value: &Number) -> Expression {
        match self {
            Expression::Number(_) => self,
            Expression::Variable(v) => {
                let select = v.select.map(|s| s.substitute(name, value));
                if v.name != name {
                    return Expression::Variable(VarRef { select, ..v });
                }
                match select.map(Select::reduce) {
                    None => Expression::Number(value.clone()),
                    Some(Select::Bit(i)) => match i.as_number().and_then(Number::get_value) {
                        Some(idx) => Expression::Number(value.truncate(idx, idx)),
                        None => Expression::Variable(VarRef {
                            select: Some(Select::Bit(i)),
                            ..v
                        }),
                    },
                    Some(Select::Part { msb, lsb }) => {
                        let hi = msb.as_number().and_then(Number::get_value);
                        let lo = lsb.as_number().and_then(Number::get_value);
                        match (hi, lo) {
                            (Some(hi), Some(lo)) if hi >= lo => {
                                Expression::Number(value.truncate(hi, lo))
                            }
                            _ => Expression::Variable(VarRef {
                                select: Some(Select::Part { msb, lsb }),
                                ..v
                            }),
                        }
                    }
                }
            }
            Expression::Call { name: f, args, span } => Expression::Call {
                name: f,
                args: args
                    .into_iter()
                    .map(|a| a.substitute(name, value))
                    .collect(),
                span,
            },
            Expression::Concat { segments, span } => Expression::Concat {
                segments: segments
                    .into_iter()
                    .map(|s| Segment {
                        repeat: s.repeat.map(|r| Box::new(r.substitute(name, value))),
                        expr: s.expr.substitute(name, value),
                    })
                    .collect(),
                span,
            },
            Expression::Unary { op, operand, span } => Expression::Unary {
                op,
                operand: Box::new(operand.substitute(name, value)),
                span,
            },
            Expression::Binary { op, lhs, rhs, span } => Expression::Binary {
                op,
                lhs: Box::new(lhs.substitute(name, value)),
                rhs: Box::new(rhs.substitute(name, value)),
                span,
            },
            Expression::Ternary {
                cond,
                then_expr,
                else_expr,
                span,
            } => Expression::Ternary {
                cond: Box::new(cond.substitute(name, value)),
                then_expr: Box::new(then_expr.substitute(name, value)),
                else_expr: Box::new(else_expr.substitute(name, value)),
                span,
            },
        }
    }

    /// Visits every variable reference in the tree, selects included.
    pub fn for_each_var(&self, f: &mut impl FnMut(&VarRef)) {
        match self {
            Expression::Number(_) => {}
            Expression::Variable(v) => {
                f(v);
                match &v.select {
                    Some(Select::Bit(i)) => i.for_each_var(f),
                    Some(Select::Part { msb, lsb }) => {
                        msb.for_each_var(f);
                        lsb.for_each_var(f);
                    }
                    None => {}
                }
            }
            Expression::Call { args, .. } => {
                for a in args {
                    a.for_each_var(f);
                }
            }
            Expression::Concat { segments, .. } => {
                for s in segments {
                    if let Some(r) = &s.repeat {
                        r.for_each_var(f);
                    }
                    s.expr.for_each_var(f);
                }
            }
            Expression::Unary { operand, .. } => operand.for_each_var(f),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.for_each_var(f);
                rhs.for_each_var(f);
            }
            Expression::Ternary {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                cond.for_each_var(f);
                then_expr.for_each_var(f);
                else_expr.for_each_var(f);
            }
        }
    }

    /// Rewrites variable reference names according to the map.
    ///
    /// Used when a named block or loop iteration is flattened and its
    /// declarations gain a hierarchical prefix.
    pub fn rename_vars(&mut self, map: &HashMap<Ident, Ident>) {
        match self {
            Expression::Number(_) => {}
            Expression::Variable(v) => {
                if let Some(new) = map.get(&v.name) {
                    v.name = *new;
                }
                match &mut v.select {
                    Some(Select::Bit(i)) => i.rename_vars(map),
                    Some(Select::Part { msb, lsb }) => {
                        msb.rename_vars(map);
                        lsb.rename_vars(map);
                    }
                    None => {}
                }
            }
            Expression::Call { args, .. } => {
                for a in args {
                    a.rename_vars(map);
                }
            }
            Expression::Concat { segments, .. } => {
                for s in segments {
                    if let Some(r) = &mut s.repeat {
                        r.rename_vars(map);
                    }
                    s.expr.rename_vars(map);
                }
            }
            Expression::Unary { operand, .. } => operand.rename_vars(map),
            Expression::Binary { lhs, rhs, .. } => {
                lhs.rename_vars(map);
                rhs.rename_vars(map);
            }
            Expression::Ternary {
                cond,
                then_expr,
                else_expr,
                ..
            } => {
                cond.rename_vars(map);
                then_expr.rename_vars(map);
                else_expr.rename_vars(map);
            }
        }
    }
}

fn fold_unary(op: UnaryOp, operand: Expression, span: Span) -> Expression {
    // Canonicalizations that apply to residual operands too.
    match op {
        UnaryOp::Plus => return operand,
        UnaryOp::Neg => {
            if let Expression::Unary {
                op: UnaryOp::Neg,
                operand: inner,
                ..
            } = operand
            {
                return *inner;
            }
            if let Some(n) = operand.as_number() {
                if let Some(negated) = n.neg() {
                    return Expression::Number(negated);
                }
            }
            return Expression::Unary {
                op,
                operand: Box::new(operand),
                span,
            };
        }
        _ => {}
    }

    if let Some(n) = operand.as_number() {
        let folded = match op {
            UnaryOp::Not => Some(n.not()),
            UnaryOp::LogicNot => n.to_bool().map(|b| Number::from_bool(!b)),
            UnaryOp::RedAnd => Some(n.red_and()),
            UnaryOp::RedNand => Some(n.red_nand()),
            UnaryOp::RedOr => Some(n.red_or()),
            UnaryOp::RedNor => Some(n.red_nor()),
            UnaryOp::RedXor => Some(n.red_xor()),
            UnaryOp::RedXnor => Some(n.red_xnor()),
            UnaryOp::Plus | UnaryOp::Neg => unreachable!(),
        };
        if let Some(folded) = folded {
            return Expression::Number(folded);
        }
    }
    Expression::Unary {
        op,
        operand: Box::new(operand),
        span,
    }
}

fn fold_binary(op: BinaryOp, lhs: Expression, rhs: Expression, span: Span) -> Expression {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        let folded = match op {
            BinaryOp::Add => a.add(b),
            BinaryOp::Sub => a.sub(b),
            BinaryOp::Mul => a.mul(b),
            BinaryOp::Div => a.div(b),
            BinaryOp::Mod => a.rem(b),
            BinaryOp::Pow => a.pow(b),
            BinaryOp::And => Some(a.and(b)),
            BinaryOp::Or => Some(a.or(b)),
            BinaryOp::Xor => Some(a.xor(b)),
            BinaryOp::Xnor => Some(a.xnor(b)),
            BinaryOp::Shl => b.get_value().map(|amount| a.shl(amount)),
            // Dropping low bits preserves the high bits, so the logical
            // and arithmetic right shifts share one kernel here.
            BinaryOp::Shr | BinaryOp::AShr => b.get_value().map(|amount| a.shr(amount)),
            BinaryOp::LogicAnd => match (a.to_bool(), b.to_bool()) {
                (Some(x), Some(y)) => Some(Number::from_bool(x && y)),
                _ => None,
            },
            BinaryOp::LogicOr => match (a.to_bool(), b.to_bool()) {
                (Some(x), Some(y)) => Some(Number::from_bool(x || y)),
                _ => None,
            },
            BinaryOp::Eq => a.log_eq(b),
            BinaryOp::Ne => a.log_ne(b),
            BinaryOp::CaseEq => Some(a.case_eq(b)),
            BinaryOp::CaseNe => Some(a.case_ne(b)),
            BinaryOp::Lt => a.lt(b),
            BinaryOp::Le => a.le(b),
            BinaryOp::Gt => a.gt(b),
            BinaryOp::Ge => a.ge(b),
        };
        if let Some(folded) = folded {
            return Expression::Number(folded);
        }
    }

    // Additive identity over a residual sibling.
    let is_zero = |e: &Expression| e.as_number().and_then(Number::to_bool) == Some(false);
    match op {
        BinaryOp::Add if is_zero(&rhs) => return lhs,
        BinaryOp::Add if is_zero(&lhs) => return rhs,
        BinaryOp::Sub if is_zero(&rhs) => return lhs,
        _ => {}
    }

    Expression::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

fn reduce_concat(segments: Vec<Segment>, span: Span) -> Expression {
    let mut out: Vec<Segment> = Vec::new();
    for seg in segments {
        let expr = seg.expr.reduce();
        match seg.repeat {
            Some(r) => {
                let r = r.reduce();
                match r.as_number().and_then(Number::get_value) {
                    Some(count) => {
                        for _ in 0..count {
                            push_segment(&mut out, expr.clone());
                        }
                    }
                    None => out.push(Segment {
                        repeat: Some(Box::new(r)),
                        expr,
                    }),
                }
            }
            None => push_segment(&mut out, expr),
        }
    }

    if out.is_empty() {
        // A fully expanded zero-count replication leaves nothing.
        return Expression::Number(Number::zero(1));
    }
    if out.len() == 1 && out[0].repeat.is_none() {
        return out.pop().map(|s| s.expr).unwrap();
    }
    Expression::Concat {
        segments: out,
        span,
    }
}

/// Appends one reduced segment, inlining nested concatenations and merging
/// adjacent constants into a single wider constant.
fn push_segment(out: &mut Vec<Segment>, expr: Expression) {
    match expr {
        Expression::Concat { segments, .. } => {
            for seg in segments {
                match seg.repeat {
                    None => push_segment(out, seg.expr),
                    Some(_) => out.push(seg),
                }
            }
        }
        Expression::Number(n) => {
            if let Some(last) = out.last_mut() {
                if last.repeat.is_none() {
                    if let Expression::Number(prev) = &last.expr {
                        // Earlier segments are more significant.
                        last.expr = Expression::Number(prev.concatenate(&n));
                        return;
                    }
                }
            }
            out.push(Segment {
                repeat: None,
                expr: Expression::Number(n),
            });
        }
        other => out.push(Segment {
            repeat: None,
            expr: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(value: u64, width: u32) -> Expression {
        Expression::Number(Number::from_u64(value, width))
    }

    fn var(raw: u32) -> Expression {
        Expression::var(Ident::from_raw(raw), Span::DUMMY)
    }

    fn folded(e: &Expression) -> u32 {
        e.as_number().and_then(Number::get_value).unwrap()
    }

    #[test]
    fn folds_constant_arithmetic() {
        let e = Expression::binary(BinaryOp::Add, num(3, 8), num(4, 8), Span::DUMMY);
        assert_eq!(folded(&e), 7);
        let e = Expression::binary(BinaryOp::Mul, num(3, 8), num(5, 8), Span::DUMMY);
        assert_eq!(folded(&e), 15);
    }

    #[test]
    fn unknown_operand_stays_residual() {
        let x = Expression::Number(Number::parse("8'bx").unwrap());
        let e = Expression::binary(BinaryOp::Add, x, num(1, 8), Span::DUMMY);
        assert!(matches!(e, Expression::Binary { .. }));
        assert!(!e.is_valuable());
    }

    #[test]
    fn bitwise_folds_four_state() {
        let x = Expression::Number(Number::from_binary_str("1x").unwrap());
        let e = Expression::binary(BinaryOp::And, x, num(0b01, 2), Span::DUMMY);
        // 1&1=1, x&0=0: fully folded even with an X operand.
        assert_eq!(format!("{}", e.as_number().unwrap()), "2'b01");
    }

    #[test]
    fn free_variable_stays_residual() {
        let e = Expression::binary(BinaryOp::Add, var(1), num(2, 8), Span::DUMMY);
        assert!(matches!(e, Expression::Binary { .. }));
    }

    #[test]
    fn additive_identity() {
        let e = Expression::binary(BinaryOp::Add, var(1), num(0, 8), Span::DUMMY);
        assert!(matches!(e, Expression::Variable(_)));
        let e = Expression::binary(BinaryOp::Add, num(0, 8), var(1), Span::DUMMY);
        assert!(matches!(e, Expression::Variable(_)));
        let e = Expression::binary(BinaryOp::Sub, var(1), num(0, 8), Span::DUMMY);
        assert!(matches!(e, Expression::Variable(_)));
    }

    #[test]
    fn unary_plus_collapses() {
        let e = Expression::unary(UnaryOp::Plus, var(1), Span::DUMMY);
        assert!(matches!(e, Expression::Variable(_)));
    }

    #[test]
    fn double_negation_coalesces() {
        let inner = Expression::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(var(1)),
            span: Span::DUMMY,
        };
        let e = Expression::unary(UnaryOp::Neg, inner, Span::DUMMY);
        assert!(matches!(e, Expression::Variable(_)));
    }

    #[test]
    fn reduction_folds_with_dominant_bit() {
        let x = Expression::Number(Number::from_binary_str("1x1").unwrap());
        let e = Expression::unary(UnaryOp::RedOr, x, Span::DUMMY);
        assert_eq!(folded(&e), 1);
    }

    #[test]
    fn shift_by_constant_folds_even_with_xz_value() {
        let x = Expression::Number(Number::from_binary_str("x1").unwrap());
        let e = Expression::binary(BinaryOp::Shl, x, num(1, 8), Span::DUMMY);
        assert_eq!(format!("{}", e.as_number().unwrap()), "3'bx10");
    }

    #[test]
    fn shift_by_variable_stays_residual() {
        let e = Expression::binary(BinaryOp::Shl, num(1, 4), var(1), Span::DUMMY);
        assert!(matches!(e, Expression::Binary { .. }));
    }

    #[test]
    fn case_equality_folds_over_xz() {
        let a = Expression::Number(Number::parse("4'b10xz").unwrap());
        let b = Expression::Number(Number::parse("4'b10xz").unwrap());
        let e = Expression::binary(BinaryOp::CaseEq, a, b, Span::DUMMY);
        assert_eq!(folded(&e), 1);
    }

    #[test]
    fn ternary_selects_constant_branch() {
        let e = Expression::ternary(num(1, 1), var(1), var(2), Span::DUMMY);
        assert!(matches!(&e, Expression::Variable(v) if v.name == Ident::from_raw(1)));
        let e = Expression::ternary(num(0, 1), var(1), var(2), Span::DUMMY);
        assert!(matches!(&e, Expression::Variable(v) if v.name == Ident::from_raw(2)));
    }

    #[test]
    fn ternary_x_condition_stays_residual() {
        let x = Expression::Number(Number::parse("1'bx").unwrap());
        let e = Expression::ternary(x, num(1, 4), num(2, 4), Span::DUMMY);
        assert!(matches!(e, Expression::Ternary { .. }));
    }

    #[test]
    fn concat_merges_adjacent_constants() {
        let e = Expression::Concat {
            segments: vec![
                Segment {
                    repeat: None,
                    expr: num(0b10, 2),
                },
                Segment {
                    repeat: None,
                    expr: num(0b01, 2),
                },
            ],
            span: Span::DUMMY,
        }
        .reduce();
        assert_eq!(folded(&e), 0b1001);
        assert_eq!(e.as_number().unwrap().width(), 4);
    }

    #[test]
    fn concat_inlines_nested() {
        let inner = Expression::Concat {
            segments: vec![
                Segment {
                    repeat: None,
                    expr: var(1),
                },
                Segment {
                    repeat: None,
                    expr: num(1, 1),
                },
            ],
            span: Span::DUMMY,
        };
        let e = Expression::Concat {
            segments: vec![
                Segment {
                    repeat: None,
                    expr: num(0, 1),
                },
                Segment {
                    repeat: None,
                    expr: inner,
                },
            ],
            span: Span::DUMMY,
        }
        .reduce();
        let Expression::Concat { segments, .. } = &e else {
            panic!("expected residual concat");
        };
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn replication_expands_with_constant_count() {
        let e = Expression::Concat {
            segments: vec![Segment {
                repeat: Some(Box::new(num(3, 8))),
                expr: num(0b1, 1),
            }],
            span: Span::DUMMY,
        }
        .reduce();
        assert_eq!(folded(&e), 0b111);
        assert_eq!(e.as_number().unwrap().width(), 3);
    }

    #[test]
    fn replication_with_variable_count_stays_residual() {
        let e = Expression::Concat {
            segments: vec![Segment {
                repeat: Some(Box::new(var(1))),
                expr: num(1, 1),
            }],
            span: Span::DUMMY,
        }
        .reduce();
        assert!(matches!(e, Expression::Concat { .. }));
    }

    #[test]
    fn single_segment_concat_unwraps() {
        let e = Expression::Concat {
            segments: vec![Segment {
                repeat: None,
                expr: var(1),
            }],
            span: Span::DUMMY,
        }
        .reduce();
        assert!(matches!(e, Expression::Variable(_)));
    }

    #[test]
    fn call_reduces_args_but_stays() {
        let arg = Expression::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(num(1, 8)),
            rhs: Box::new(num(2, 8)),
            span: Span::DUMMY,
        };
        let e = Expression::Call {
            name: Ident::from_raw(9),
            args: vec![arg],
            span: Span::DUMMY,
        }
        .reduce();
        let Expression::Call { args, .. } = &e else {
            panic!("expected residual call");
        };
        assert_eq!(folded(&args[0]), 3);
    }

    #[test]
    fn reduce_is_idempotent() {
        let e = Expression::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(var(1)),
            rhs: Box::new(Expression::Binary {
                op: BinaryOp::Mul,
                lhs: Box::new(num(2, 8)),
                rhs: Box::new(num(3, 8)),
                span: Span::DUMMY,
            }),
            span: Span::DUMMY,
        };
        let once = e.reduce();
        let twice = once.clone().reduce();
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn substitute_whole_variable() {
        let i = Ident::from_raw(1);
        let e = Expression::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(Expression::var(i, Span::DUMMY)),
            rhs: Box::new(num(1, 32)),
            span: Span::DUMMY,
        };
        let e = e.substitute(i, &Number::from_u64(2, 32)).reduce();
        assert_eq!(folded(&e), 3);
    }

    #[test]
    fn substitute_applies_bit_select() {
        let i = Ident::from_raw(1);
        let e = Expression::Variable(VarRef {
            name: i,
            select: Some(Select::Bit(Box::new(num(2, 32)))),
            span: Span::DUMMY,
        });
        let e = e.substitute(i, &Number::from_u64(0b100, 4)).reduce();
        assert_eq!(folded(&e), 1);
    }

    #[test]
    fn substitute_applies_part_select() {
        let i = Ident::from_raw(1);
        let e = Expression::Variable(VarRef {
            name: i,
            select: Some(Select::Part {
                msb: Box::new(num(2, 32)),
                lsb: Box::new(num(1, 32)),
            }),
            span: Span::DUMMY,
        });
        let e = e.substitute(i, &Number::from_u64(0b110, 4)).reduce();
        assert_eq!(folded(&e), 0b11);
    }

    #[test]
    fn substitute_leaves_other_variables() {
        let e = var(2).substitute(Ident::from_raw(1), &Number::from_u64(5, 4));
        assert!(matches!(e, Expression::Variable(v) if v.name == Ident::from_raw(2)));
    }

    #[test]
    fn rename_vars_rewrites_references() {
        let mut e = Expression::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(var(1)),
            rhs: Box::new(var(2)),
            span: Span::DUMMY,
        };
        let mut map = HashMap::new();
        map.insert(Ident::from_raw(1), Ident::from_raw(10));
        e.rename_vars(&map);
        let mut names = Vec::new();
        e.for_each_var(&mut |v| names.push(v.name.as_raw()));
        assert_eq!(names, vec![10, 2]);
    }
}
