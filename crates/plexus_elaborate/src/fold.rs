//! Constant-driven control-flow elaboration.
//!
//! Each pass takes a block's statement list and returns a new one: constant
//! ifs and cases are collapsed to the statements of the surviving branch,
//! for loops with constant bounds are unrolled copy by copy, and everything
//! that cannot be decided at elaboration time stays residual for the
//! downstream graph stage. Splicing reuses the classification helper, so
//! surviving branch declarations become visible in the parent scope.

use std::mem;

use plexus_common::{Ident, Interner};
use plexus_config::ElaborationConfig;
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::{
    BlockId, CaseArm, CaseKind, Connection, Expression, ForAssign, Module, Number, ScopeTree, Stmt,
};
use plexus_source::Span;

use crate::errors;
use crate::scope::splice_block;

/// Elaborates all control flow of a module, starting at the root block.
pub fn fold_module(
    module: &mut Module,
    limits: &ElaborationConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    fold_block(&mut module.scope, module.root, limits, interner, sink);
}

/// Elaborates one block's statement list.
pub fn fold_block(
    scope: &mut ScopeTree,
    block: BlockId,
    limits: &ElaborationConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let stmts = mem::take(&mut scope.block_mut(block).stmts);
    let mut out = Vec::with_capacity(stmts.len());

    for mut stmt in stmts {
        match stmt {
            Stmt::Assign(_) | Stmt::Call { .. } => {
                stmt.reduce_exprs();
                out.push(stmt);
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
                span,
            } => {
                let condition = condition.reduce();
                match condition.as_number().and_then(Number::to_bool) {
                    Some(true) => {
                        fold_block(scope, then_block, limits, interner, sink);
                        splice_block(scope, block, then_block, &mut out, interner, sink);
                    }
                    Some(false) => {
                        if let Some(else_block) = else_block {
                            fold_block(scope, else_block, limits, interner, sink);
                            splice_block(scope, block, else_block, &mut out, interner, sink);
                        }
                    }
                    None => {
                        fold_block(scope, then_block, limits, interner, sink);
                        if let Some(else_block) = else_block {
                            fold_block(scope, else_block, limits, interner, sink);
                        }
                        out.push(Stmt::If {
                            condition,
                            then_block,
                            else_block,
                            span,
                        });
                    }
                }
            }
            Stmt::Case {
                kind,
                selector,
                mut arms,
                default,
                span,
            } => {
                let selector = selector.reduce();
                for arm in &mut arms {
                    for pat in &mut arm.patterns {
                        let taken = mem::replace(pat, Expression::Number(Number::zero(1)));
                        *pat = taken.reduce();
                    }
                }
                if arms.is_empty() && default.is_none() {
                    continue;
                }
                match decide_case(kind, &selector, &arms, default) {
                    CaseDecision::Take(body) => {
                        fold_block(scope, body, limits, interner, sink);
                        splice_block(scope, block, body, &mut out, interner, sink);
                    }
                    CaseDecision::NoMatch => {
                        sink.emit(errors::warn_case_no_match(span));
                    }
                    CaseDecision::Residual => {
                        for arm in &arms {
                            fold_block(scope, arm.body, limits, interner, sink);
                        }
                        if let Some(default) = default {
                            fold_block(scope, default, limits, interner, sink);
                        }
                        out.push(Stmt::Case {
                            kind,
                            selector,
                            arms,
                            default,
                            span,
                        });
                    }
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
                span,
            } => {
                unroll_for(
                    scope, block, init, condition, step, body, span, &mut out, limits, interner,
                    sink,
                );
            }
            Stmt::While {
                condition,
                body,
                span,
            } => {
                // While loops are never unrolled; kept residual.
                let condition = condition.reduce();
                fold_block(scope, body, limits, interner, sink);
                out.push(Stmt::While {
                    condition,
                    body,
                    span,
                });
            }
            Stmt::Block(nested) => {
                // Only named blocks survive classification as statements.
                fold_block(scope, nested, limits, interner, sink);
                out.push(Stmt::Block(nested));
            }
            Stmt::VarDecl(_) | Stmt::InstanceDecl(_) | Stmt::FunctionDecl(_) => {
                debug_assert!(false, "declaration survived classification");
            }
        }
    }

    scope.block_mut(block).stmts = out;
}

enum CaseDecision {
    Take(BlockId),
    NoMatch,
    Residual,
}

/// Decides a case statement at elaboration time, when possible.
///
/// Requires a valuable selector and constant patterns throughout; any
/// residual expression keeps the whole statement residual. A constant X/Z
/// selector also stays residual: under `casex`/`casez` it could match
/// several arms at once, so no single splice is justified.
fn decide_case(
    kind: CaseKind,
    selector: &Expression,
    arms: &[CaseArm],
    default: Option<BlockId>,
) -> CaseDecision {
    let Some(sel) = selector.as_number().filter(|n| n.is_valuable()) else {
        return CaseDecision::Residual;
    };
    for arm in arms {
        for pat in &arm.patterns {
            let Some(pat) = pat.as_number() else {
                return CaseDecision::Residual;
            };
            if case_matches(kind, sel, pat) {
                return CaseDecision::Take(arm.body);
            }
        }
    }
    match default {
        Some(body) => CaseDecision::Take(body),
        None => CaseDecision::NoMatch,
    }
}

/// Matches a selector against a pattern under the given rule, both extended
/// to the wider width first.
fn case_matches(kind: CaseKind, sel: &Number, pat: &Number) -> bool {
    let width = sel.width().max(pat.width());
    let sel = sel.set_width(width);
    let pat = pat.set_width(width);
    (0..width).all(|i| match kind {
        CaseKind::Case => sel.get(i).matches_exact(pat.get(i)),
        CaseKind::CaseZ => sel.get(i).matches_casez(pat.get(i)),
        CaseKind::CaseX => sel.get(i).matches_casex(pat.get(i)),
    })
}

/// Unrolls a for loop into consecutive copies of its body.
///
/// Each iteration clones the body subtree, substitutes the loop value
/// everywhere, prefixes the copy's declarations when the body is named,
/// elaborates the copy, and splices it into the parent. The loop variable
/// itself never becomes a declaration in the parent.
#[allow(clippy::too_many_arguments)]
fn unroll_for(
    scope: &mut ScopeTree,
    parent: BlockId,
    init: ForAssign,
    condition: Expression,
    step: ForAssign,
    body: BlockId,
    span: Span,
    out: &mut Vec<Stmt>,
    limits: &ElaborationConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    if init.var != step.var {
        sink.emit(errors::error_malformed_for(
            "the step must assign the loop variable",
            span,
        ));
        return;
    }
    let var = init.var;

    let init_value = init.value.reduce();
    let Some(mut value) = init_value
        .as_number()
        .filter(|n| n.is_valuable())
        .cloned()
    else {
        sink.emit(errors::error_nonconstant_bound("initializer", init.span));
        return;
    };

    let mut iterations = 0usize;
    loop {
        let cond = condition.clone().substitute(var, &value).reduce();
        let Some(proceed) = cond.as_number().and_then(Number::to_bool) else {
            sink.emit(errors::error_nonconstant_bound("condition", span));
            return;
        };
        if !proceed {
            break;
        }

        iterations += 1;
        if iterations > limits.max_unroll_iterations {
            sink.emit(errors::error_unroll_cap(limits.max_unroll_iterations, span));
            return;
        }

        let copy = scope.clone_subtree(body);
        scope.set_parent(copy, parent);
        substitute_subtree(scope, copy, var, &value);
        if let Some(name) = scope.block(copy).name {
            let iteration = value
                .get_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|| value.to_string());
            let prefix = format!("{}{iteration}", interner.resolve(name));
            prefix_subtree(scope, copy, &prefix, interner);
        }
        fold_block(scope, copy, limits, interner, sink);
        splice_block(scope, parent, copy, out, interner, sink);

        let next = step.value.clone().substitute(var, &value).reduce();
        let Some(next) = next.as_number().filter(|n| n.is_valuable()).cloned() else {
            sink.emit(errors::error_nonconstant_bound("step", step.span));
            return;
        };
        value = next;
    }
}

/// Substitutes a constant for a name throughout a subtree: statements,
/// declared widths and initializers, instance connections.
fn substitute_subtree(scope: &mut ScopeTree, root: BlockId, name: Ident, value: &Number) {
    let mut blocks = Vec::new();
    scope.visit_reachable(root, &mut |id| blocks.push(id));

    fn subst(expr: &mut Expression, name: Ident, value: &Number) {
        let taken = mem::replace(expr, Expression::Number(Number::zero(1)));
        *expr = taken.substitute(name, value).reduce();
    }

    for id in blocks {
        let block = scope.block_mut(id);
        for stmt in &mut block.stmts {
            stmt.for_each_expr_mut(&mut |e| subst(e, name, value));
        }
        for var in block.variables.iter_mut() {
            if let Some(width) = &mut var.width {
                subst(width, name, value);
            }
            if let Some(init) = &mut var.init {
                subst(init, name, value);
            }
        }
        for inst in block.instances.iter_mut() {
            for pc in &mut inst.ports {
                if let Some(Connection::Expr(e)) = &mut pc.conn {
                    subst(e, name, value);
                }
            }
            for po in &mut inst.params {
                subst(&mut po.value, name, value);
            }
        }
    }
}

/// Prefixes every variable and instance declared in the subtree with
/// `<prefix>.`, renaming both the table entries and all references.
fn prefix_subtree(scope: &mut ScopeTree, root: BlockId, prefix: &str, interner: &Interner) {
    let mut blocks = Vec::new();
    scope.visit_reachable(root, &mut |id| blocks.push(id));

    let mut map = std::collections::HashMap::new();
    for &id in &blocks {
        let block = scope.block(id);
        for var in block.variables.iter() {
            map.entry(var.name)
                .or_insert_with(|| interner.with_prefix(prefix, var.name));
        }
        for inst in block.instances.iter() {
            map.entry(inst.name)
                .or_insert_with(|| interner.with_prefix(prefix, inst.name));
        }
    }

    for &id in &blocks {
        let block = scope.block_mut(id);
        let olds: Vec<Ident> = block.variables.iter().map(|v| v.name).collect();
        for old in olds {
            block.variables.rename(old, map[&old]);
        }
        let olds: Vec<Ident> = block.instances.iter().map(|i| i.name).collect();
        for old in olds {
            block.instances.rename(old, map[&old]);
        }
        for stmt in &mut block.stmts {
            stmt.rename_vars(&map);
        }
    }
}
