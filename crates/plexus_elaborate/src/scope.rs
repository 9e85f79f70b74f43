//! Scope classification and the block-splicing helpers.
//!
//! Classification takes the raw statement list the parser produced and
//! moves every declaration into its scope's symbol tables, leaving only
//! executable statements behind. Unnamed nested blocks are dissolved into
//! their parent on the way; named blocks stay nested so their symbols keep
//! a scope of their own until flattening prefixes them.
//!
//! The pass is pure in the statement-list sense: each block's list is taken,
//! rebuilt, and put back, never mutated while being walked.

use std::collections::HashSet;
use std::mem;

use plexus_common::{Ident, Interner};
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::{
    Assign, AssignKind, BlockId, Expression, Module, Number, ScopeTree, Stmt, SymbolKind, VarKind,
    VarRef, Variable,
};
use plexus_source::Span;

use crate::errors;

/// Classifies every scope of a module, root block first.
pub fn classify_module(module: &mut Module, interner: &Interner, sink: &DiagnosticSink) {
    classify_block(&mut module.scope, module.root, interner, sink);
}

/// Classifies one block: declarations move into the tables, unnamed nested
/// blocks are spliced, control-flow bodies are classified in place.
pub fn classify_block(
    scope: &mut ScopeTree,
    block: BlockId,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let stmts = mem::take(&mut scope.block_mut(block).stmts);
    let mut out = Vec::with_capacity(stmts.len());

    for stmt in stmts {
        match stmt {
            Stmt::VarDecl(mut var) => {
                if let Some(prev) = scope.block(block).variables.get(var.name) {
                    sink.emit(errors::error_duplicate_declaration(
                        SymbolKind::Variable,
                        interner.resolve(var.name),
                        var.span,
                        prev.span,
                    ));
                    continue;
                }
                if var.kind == VarKind::Net {
                    if let Some(init) = var.init.take() {
                        out.push(Stmt::Assign(Assign {
                            target: VarRef {
                                name: var.name,
                                select: None,
                                span: var.span,
                            },
                            kind: AssignKind::Continuous,
                            rhs: init,
                            span: var.span,
                        }));
                    }
                }
                let _ = scope.block_mut(block).variables.insert(var);
            }
            Stmt::InstanceDecl(mut inst) => {
                while scope.block(block).instances.contains(inst.name) {
                    inst.name = interner.suffix_increase(inst.name);
                }
                let _ = scope.block_mut(block).instances.insert(inst);
            }
            Stmt::FunctionDecl(func) => {
                classify_block(scope, func.body, interner, sink);
                if let Some(prev) = scope.block(block).functions.get(func.name) {
                    sink.emit(errors::error_duplicate_declaration(
                        SymbolKind::Function,
                        interner.resolve(func.name),
                        func.span,
                        prev.span,
                    ));
                    continue;
                }
                let _ = scope.block_mut(block).functions.insert(func);
            }
            Stmt::Block(child) => {
                classify_block(scope, child, interner, sink);
                if scope.block(child).name.is_none() {
                    splice_block(scope, block, child, &mut out, interner, sink);
                } else {
                    out.push(Stmt::Block(child));
                }
            }
            other => {
                let mut kids = Vec::new();
                other.child_blocks(&mut kids);
                for kid in kids {
                    classify_block(scope, kid, interner, sink);
                }
                out.push(other);
            }
        }
    }

    scope.block_mut(block).stmts = out;
}

/// Dissolves `child` into `parent`: its statements are appended to `out`,
/// its tables merged into the parent's, and the blocks its statements
/// reference are reparented.
///
/// Variable and function collisions are duplicate declarations (the parent's
/// entry wins); instance collisions are renamed until unique. The child
/// block stays in the arena but becomes unreachable.
pub(crate) fn splice_block(
    scope: &mut ScopeTree,
    parent: BlockId,
    child: BlockId,
    out: &mut Vec<Stmt>,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let child_stmts = mem::take(&mut scope.block_mut(child).stmts);
    let vars = scope.block_mut(child).variables.drain();
    let insts = scope.block_mut(child).instances.drain();
    let funcs = scope.block_mut(child).functions.drain();

    for var in vars {
        if let Some(prev) = scope.block(parent).variables.get(var.name) {
            sink.emit(errors::error_duplicate_declaration(
                SymbolKind::Variable,
                interner.resolve(var.name),
                var.span,
                prev.span,
            ));
            continue;
        }
        let _ = scope.block_mut(parent).variables.insert(var);
    }
    for mut inst in insts {
        while scope.block(parent).instances.contains(inst.name) {
            inst.name = interner.suffix_increase(inst.name);
        }
        let _ = scope.block_mut(parent).instances.insert(inst);
    }
    for func in funcs {
        if let Some(prev) = scope.block(parent).functions.get(func.name) {
            sink.emit(errors::error_duplicate_declaration(
                SymbolKind::Function,
                interner.resolve(func.name),
                func.span,
                prev.span,
            ));
            continue;
        }
        let _ = scope.block_mut(parent).functions.insert(func);
    }

    for stmt in child_stmts {
        let mut kids = Vec::new();
        stmt.child_blocks(&mut kids);
        for kid in kids {
            scope.set_parent(kid, parent);
        }
        out.push(stmt);
    }
}

/// Synthesizes a 1-bit net at module scope for every reference that
/// resolves to no declaration, port, or parameter (`W300`).
///
/// Runs after control-flow elaboration, when only residual statements are
/// left. Function bodies are not scanned; their argument names resolve at
/// call-inlining time in the downstream stage.
pub fn declare_implicit_nets(module: &mut Module, interner: &Interner, sink: &DiagnosticSink) {
    let mut missing: Vec<(Ident, Span)> = Vec::new();
    let mut seen: HashSet<Ident> = HashSet::new();

    let mut pending = vec![module.root];
    while let Some(block) = pending.pop() {
        for stmt in &module.scope.block(block).stmts {
            stmt.child_blocks(&mut pending);
            let mut record = |name: Ident, span: Span| {
                if !seen.insert(name) {
                    return;
                }
                let declared = module.scope.lookup_var(block, name).is_some()
                    || module.ports.contains(name)
                    || module.params.contains(name);
                if !declared {
                    missing.push((name, span));
                }
            };
            if let Stmt::Assign(a) = stmt {
                record(a.target.name, a.target.span);
            }
            stmt.for_each_expr(&mut |e| {
                e.for_each_var(&mut |v| record(v.name, v.span));
            });
        }
    }

    for (name, span) in missing {
        sink.emit(errors::warn_implicit_net(interner.resolve(name), span));
        let _ = module.scope.block_mut(module.root).variables.insert(Variable {
            name,
            kind: VarKind::Net,
            width: None,
            signed: false,
            init: None,
            span,
        });
    }
}

/// Rejects reg initializers that stayed non-constant after folding
/// (`E309`). The initializer is dropped; the declaration is kept.
pub fn check_reg_initializers(module: &mut Module, interner: &Interner, sink: &DiagnosticSink) {
    let mut blocks = Vec::new();
    module.scope.visit_reachable(module.root, &mut |id| blocks.push(id));

    for block in blocks {
        for var in module.scope.block_mut(block).variables.iter_mut() {
            if var.kind != VarKind::Reg {
                continue;
            }
            let Some(init) = var.init.take() else {
                continue;
            };
            let init = init.reduce();
            if init.as_number().is_some() {
                var.init = Some(init);
            } else {
                sink.emit(errors::error_reg_initializer(
                    interner.resolve(var.name),
                    var.span,
                ));
            }
        }
    }
}

/// Substitutes the module's resolved parameter constants into every
/// expression: statements, declared widths and initializers, port widths.
pub fn substitute_parameters(module: &mut Module) {
    let bindings: Vec<(Ident, Number)> = module
        .params
        .iter()
        .filter_map(|p| p.value.as_number().map(|n| (p.name, n.clone())))
        .collect();
    if bindings.is_empty() {
        return;
    }

    let substitute = |expr: &mut Expression, bindings: &[(Ident, Number)]| {
        let mut taken = mem::replace(expr, Expression::Number(Number::zero(1)));
        for (name, value) in bindings {
            taken = taken.substitute(*name, value);
        }
        *expr = taken.reduce();
    };

    for port in module.ports.iter_mut() {
        if let Some(width) = &mut port.width {
            substitute(width, &bindings);
        }
    }

    let mut blocks = Vec::new();
    module.scope.visit_reachable(module.root, &mut |id| blocks.push(id));
    for block in blocks {
        let b = module.scope.block_mut(block);
        for stmt in &mut b.stmts {
            stmt.for_each_expr_mut(&mut |e| substitute(e, &bindings));
        }
        for var in b.variables.iter_mut() {
            if let Some(width) = &mut var.width {
                substitute(width, &bindings);
            }
            if let Some(init) = &mut var.init {
                substitute(init, &bindings);
            }
        }
        for inst in b.instances.iter_mut() {
            for pc in &mut inst.ports {
                if let Some(plexus_ir::Connection::Expr(e)) = &mut pc.conn {
                    substitute(e, &bindings);
                }
            }
            for po in &mut inst.params {
                substitute(&mut po.value, &bindings);
            }
        }
    }
}
