//! Instance elaboration: port binding, parameter resolution, and
//! specialization requests.
//!
//! Runs after a module's control flow is elaborated, so every surviving
//! instance is unconditionally live. Each instance resolves its target in
//! the registry, binds positional connections to declared ports, resolves
//! its parameter tuple to constants, and asks the context for the matching
//! specialization. Binding errors are reported and recovered from; only an
//! undefined target leaves an instance unresolved.

use plexus_common::{Ident, Interner};
use plexus_diagnostics::DiagnosticSink;
use plexus_ir::{Connection, Expression, Instance, Module, ModuleId, Number, ParamOverride};

use crate::context::ElabContext;
use crate::errors;

/// Elaborates every instance reachable in the given module.
pub fn elaborate_instances(mid: ModuleId, ctx: &mut ElabContext) {
    let registry = ctx.registry;
    let interner = ctx.interner;
    let sink = ctx.sink;

    let mut blocks = Vec::new();
    {
        let module = ctx.design.modules.get(mid);
        module
            .scope
            .visit_reachable(module.root, &mut |id| blocks.push(id));
    }

    for block in blocks {
        let names: Vec<Ident> = ctx
            .design
            .modules
            .get(mid)
            .scope
            .block(block)
            .instances
            .iter()
            .map(|i| i.name)
            .collect();

        for name in names {
            let (target, span) = {
                let module = ctx.design.modules.get(mid);
                let inst = module.scope.block(block).instances.get(name).unwrap();
                (inst.target, inst.span)
            };
            let Some(source) = registry.lookup(target) else {
                sink.emit(errors::error_undefined_module(
                    interner.resolve(target),
                    span,
                ));
                continue;
            };

            let params = {
                let module = ctx.design.modules.get_mut(mid);
                let inst = module
                    .scope
                    .block_mut(block)
                    .instances
                    .get_mut(name)
                    .unwrap();
                bind_ports(inst, source, interner, sink);
                resolve_params(source, &inst.params, interner, sink)
            };

            if let Some(resolved) = ctx.specialize(source, params, span) {
                let module = ctx.design.modules.get_mut(mid);
                let inst = module
                    .scope
                    .block_mut(block)
                    .instances
                    .get_mut(name)
                    .unwrap();
                inst.resolved = Some(resolved);
            }
        }
    }
}

/// Binds an instance's connections to the target's declared ports.
///
/// Positional connections are matched in declaration order and given the
/// port's name; named connections are checked against the port table.
/// Connection expressions are reduced, and a bare variable reference is
/// demoted from an expression to a direct connection.
fn bind_ports(inst: &mut Instance, source: &Module, interner: &Interner, sink: &DiagnosticSink) {
    if inst.ports.len() > source.ports.len() {
        sink.emit(errors::error_port_count(
            interner.resolve(source.name),
            source.ports.len(),
            inst.ports.len(),
            inst.span,
        ));
    }

    for (position, pc) in inst.ports.iter_mut().enumerate() {
        let port = match pc.port {
            Some(named) => {
                let Some(port) = source.ports.get(named) else {
                    sink.emit(errors::error_unknown_port(
                        interner.resolve(named),
                        interner.resolve(source.name),
                        pc.span,
                    ));
                    continue;
                };
                port
            }
            None => {
                let Some(port) = source.ports.at(position) else {
                    // Excess positional connection, already counted above.
                    continue;
                };
                pc.port = Some(port.name);
                port
            }
        };
        pc.direction = Some(port.direction);

        pc.conn = match pc.conn.take() {
            Some(Connection::Expr(expr)) => Some(match expr.reduce() {
                Expression::Variable(var) => Connection::Variable(var),
                reduced => Connection::Expr(reduced),
            }),
            other => other,
        };
    }
}

/// Resolves a parameter tuple to constants, in declaration order.
///
/// Each parameter takes its override when one is given, its declared
/// default otherwise. Earlier parameters of the same tuple are substituted
/// into later values before reduction, so defaults may reference preceding
/// parameters. A value that stays non-constant is reported (`E306`) and
/// replaced by the resolved default; if the default fails too, a 32-bit
/// zero stands in so elaboration can continue.
pub(crate) fn resolve_params(
    source: &Module,
    overrides: &[ParamOverride],
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<(Ident, Number)> {
    if overrides.len() > source.params.len() {
        sink.emit(errors::error_param_count(
            interner.resolve(source.name),
            source.params.len(),
            overrides.len(),
            overrides[source.params.len()].span,
        ));
    }

    let mut by_param: Vec<Option<&ParamOverride>> = vec![None; source.params.len()];
    for (position, ov) in overrides.iter().enumerate() {
        match ov.param {
            Some(named) => match source.params.position(named) {
                Some(i) => by_param[i] = Some(ov),
                None => sink.emit(errors::error_unknown_parameter(
                    interner.resolve(named),
                    interner.resolve(source.name),
                    ov.span,
                )),
            },
            None => {
                if let Some(slot) = by_param.get_mut(position) {
                    *slot = Some(ov);
                }
            }
        }
    }

    let mut resolved: Vec<(Ident, Number)> = Vec::with_capacity(source.params.len());
    for (param, ov) in source.params.iter().zip(&by_param) {
        let value = match ov {
            Some(ov) => resolve_one(&ov.value, &resolved).or_else(|| {
                sink.emit(errors::error_nonconstant_parameter(
                    interner.resolve(param.name),
                    ov.span,
                ));
                resolve_one(&param.value, &resolved)
            }),
            None => {
                let value = resolve_one(&param.value, &resolved);
                if value.is_none() {
                    sink.emit(errors::error_nonconstant_parameter(
                        interner.resolve(param.name),
                        param.span,
                    ));
                }
                value
            }
        };
        resolved.push((param.name, value.unwrap_or_else(|| Number::zero(32))));
    }
    resolved
}

/// Resolves a parameter tuple for a module instantiated without overrides,
/// such as the top module.
pub(crate) fn default_params(
    source: &Module,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<(Ident, Number)> {
    resolve_params(source, &[], interner, sink)
}

fn resolve_one(expr: &Expression, resolved: &[(Ident, Number)]) -> Option<Number> {
    let mut expr = expr.clone();
    for (name, value) in resolved {
        expr = expr.substitute(*name, value);
    }
    expr.reduce()
        .as_number()
        .filter(|n| n.is_valuable())
        .cloned()
}
