//! Symbolic driving-expression extraction.
//!
//! After elaboration the residual control flow of a block is pure dataflow:
//! the value a variable ends up with is the last whole-variable assignment
//! on the path actually taken. [`driving_expression`] folds a block's
//! statement list into a single expression equivalent to that value, with
//! residual ifs becoming ternaries and residual cases becoming ternary
//! chains keyed on selector equality. Partial (bit or part select)
//! assignments are opaque to this query and do not contribute.

use plexus_common::Ident;
use plexus_ir::{BinaryOp, BlockId, Expression, ScopeTree, Stmt};
use plexus_source::Span;

/// Computes the expression driving `var` at the end of `block`.
///
/// When no assignment on any path covers the variable, the result is a
/// reference to the variable itself, standing for its previous value.
pub fn driving_expression(scope: &ScopeTree, block: BlockId, var: Ident) -> Expression {
    drive_in_block(scope, block, var, Expression::var(var, Span::DUMMY))
}

fn drive_in_block(
    scope: &ScopeTree,
    block: BlockId,
    var: Ident,
    incoming: Expression,
) -> Expression {
    let mut current = incoming;
    for stmt in &scope.block(block).stmts {
        match stmt {
            Stmt::Assign(assign) => {
                if assign.target.name == var && assign.target.select.is_none() {
                    current = assign.rhs.clone();
                }
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
                span,
            } => {
                let then_value = drive_in_block(scope, *then_block, var, current.clone());
                let else_value = match else_block {
                    Some(else_block) => drive_in_block(scope, *else_block, var, current.clone()),
                    None => current.clone(),
                };
                current = Expression::ternary(condition.clone(), then_value, else_value, *span);
            }
            Stmt::Case {
                selector,
                arms,
                default,
                span,
                ..
            } => {
                let mut value = match default {
                    Some(default) => drive_in_block(scope, *default, var, current.clone()),
                    None => current.clone(),
                };
                for arm in arms.iter().rev() {
                    let mut hit: Option<Expression> = None;
                    for pattern in &arm.patterns {
                        let eq = Expression::binary(
                            BinaryOp::Eq,
                            selector.clone(),
                            pattern.clone(),
                            arm.span,
                        );
                        hit = Some(match hit {
                            Some(prev) => {
                                Expression::binary(BinaryOp::LogicOr, prev, eq, arm.span)
                            }
                            None => eq,
                        });
                    }
                    if let Some(hit) = hit {
                        let arm_value = drive_in_block(scope, arm.body, var, current.clone());
                        value = Expression::ternary(hit, arm_value, value, *span);
                    }
                }
                current = value;
            }
            Stmt::Block(nested) => {
                current = drive_in_block(scope, *nested, var, current);
            }
            // Residual loops have data-dependent trip counts; their writes
            // cannot be summarized symbolically.
            Stmt::While { .. } | Stmt::For { .. } => {}
            _ => {}
        }
    }
    current
}
