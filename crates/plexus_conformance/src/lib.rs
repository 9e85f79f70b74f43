//! Conformance test helpers for the plexus elaboration engine.
//!
//! Provides a shared pipeline function that elaborates an in-memory module
//! list with a given configuration and returns structured results, plus a
//! small builder vocabulary for constructing IR fixtures without drowning
//! the tests in struct literals.

#![warn(missing_docs)]

use plexus_common::Interner;
use plexus_config::ProjectConfig;
use plexus_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use plexus_elaborate::ParsedDesign;
use plexus_ir::{Design, Module};

/// Result of running the elaboration pipeline.
pub struct PipelineResult {
    /// The elaborated design.
    pub design: Design,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// The elaborated top module.
    ///
    /// # Panics
    ///
    /// Panics if no top module was elaborated.
    pub fn top(&self) -> &Module {
        &self.design.modules[self.design.top.expect("design has no top module")]
    }

    /// Returns `true` if any diagnostic carries the given code.
    pub fn has_code(&self, code: plexus_diagnostics::DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

/// Creates a minimal `ProjectConfig` with the given top module name.
pub fn make_config(top: &str) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
version = "0.1.0"
top = "{top}"
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Creates a `ProjectConfig` with explicit elaboration bounds.
pub fn make_config_with_limits(top: &str, max_unroll: usize, max_specializations: usize) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
top = "{top}"

[elaboration]
max_unroll_iterations = {max_unroll}
max_specializations = {max_specializations}
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Elaborates the given modules with the given configuration.
pub fn run_pipeline(
    modules: Vec<Module>,
    interner: &Interner,
    config: &ProjectConfig,
) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let parsed = ParsedDesign { modules };

    let design = plexus_elaborate::elaborate(&parsed, config, interner, &sink)
        .expect("elaboration should not return internal error");

    let diagnostics = sink.diagnostics();
    let has_errors = sink.has_errors();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    PipelineResult {
        design,
        diagnostics,
        has_errors,
        error_count,
        warning_count,
    }
}

/// Elaborates the given modules with a default configuration.
pub fn full_pipeline(modules: Vec<Module>, interner: &Interner, top: &str) -> PipelineResult {
    run_pipeline(modules, interner, &make_config(top))
}

/// IR fixture builders shared across the conformance tests.
pub mod build {
    use plexus_common::{Ident, Interner};
    use plexus_ir::{
        Assign, AssignKind, BinaryOp, Block, BlockId, Expression, ForAssign, Instance, Module,
        Number, ParamOverride, Parameter, Stmt, VarKind, VarRef, Variable,
    };
    use plexus_source::Span;

    /// An unsigned constant expression.
    pub fn num(value: u64, width: u32) -> Expression {
        Expression::Number(Number::from_u64(value, width))
    }

    /// A bare variable reference expression.
    pub fn var(interner: &Interner, name: &str) -> Expression {
        Expression::var(interner.get_or_intern(name), Span::DUMMY)
    }

    /// An unreduced binary expression.
    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: Span::DUMMY,
        }
    }

    /// A 1-bit net declaration statement.
    pub fn net(interner: &Interner, name: &str) -> Stmt {
        Stmt::VarDecl(Variable {
            name: interner.get_or_intern(name),
            kind: VarKind::Net,
            width: None,
            signed: false,
            init: None,
            span: Span::DUMMY,
        })
    }

    /// A reg declaration with an initializer.
    pub fn reg_init(interner: &Interner, name: &str, init: Expression) -> Stmt {
        Stmt::VarDecl(Variable {
            name: interner.get_or_intern(name),
            kind: VarKind::Reg,
            width: None,
            signed: false,
            init: Some(init),
            span: Span::DUMMY,
        })
    }

    /// A continuous whole-variable assignment.
    pub fn assign(interner: &Interner, target: &str, rhs: Expression) -> Stmt {
        Stmt::Assign(Assign {
            target: VarRef {
                name: interner.get_or_intern(target),
                select: None,
                span: Span::DUMMY,
            },
            kind: AssignKind::Continuous,
            rhs,
            span: Span::DUMMY,
        })
    }

    /// An instantiation statement with positional parameter overrides.
    pub fn instantiate(interner: &Interner, name: &str, target: &str, params: &[u64]) -> Stmt {
        Stmt::InstanceDecl(Instance {
            name: interner.get_or_intern(name),
            target: interner.get_or_intern(target),
            resolved: None,
            ports: Vec::new(),
            params: params
                .iter()
                .map(|&v| ParamOverride {
                    param: None,
                    value: num(v, 32),
                    span: Span::DUMMY,
                })
                .collect(),
            span: Span::DUMMY,
        })
    }

    /// An empty module.
    pub fn module(interner: &Interner, name: &str) -> Module {
        Module::new(interner.get_or_intern(name), Span::DUMMY)
    }

    /// Adds a parameter with a constant default to the module.
    pub fn add_param(module: &mut Module, interner: &Interner, name: &str, value: u64) {
        module
            .params
            .insert(Parameter {
                name: interner.get_or_intern(name),
                value: num(value, 32),
                span: Span::DUMMY,
            })
            .unwrap();
    }

    /// Allocates a child block, optionally named, under the given parent.
    pub fn child(module: &mut Module, interner: &Interner, name: Option<&str>, parent: BlockId) -> BlockId {
        let name = name.map(|n| interner.get_or_intern(n));
        module
            .scope
            .alloc_child(Block::new(name, Span::DUMMY), parent)
    }

    /// A `for (v = from; v < to; v = v + 1)` statement over the given body.
    pub fn count_loop(interner: &Interner, loop_var: &str, from: u64, to: u64, body: BlockId) -> Stmt {
        let v: Ident = interner.get_or_intern(loop_var);
        Stmt::For {
            init: ForAssign {
                var: v,
                value: num(from, 32),
                span: Span::DUMMY,
            },
            condition: binary(
                BinaryOp::Lt,
                Expression::var(v, Span::DUMMY),
                num(to, 32),
            ),
            step: ForAssign {
                var: v,
                value: binary(BinaryOp::Add, Expression::var(v, Span::DUMMY), num(1, 32)),
                span: Span::DUMMY,
            },
            body,
            span: Span::DUMMY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_config_creates_valid_config() {
        let config = make_config("top");
        assert_eq!(config.project.top, "top");
        assert_eq!(config.project.name, "conformance_test");
    }

    #[test]
    fn limits_config_overrides_bounds() {
        let config = make_config_with_limits("top", 16, 8);
        assert_eq!(config.elaboration.max_unroll_iterations, 16);
        assert_eq!(config.elaboration.max_specializations, 8);
    }

    #[test]
    fn pipeline_empty_module() {
        let interner = Interner::new();
        let result = full_pipeline(vec![build::module(&interner, "top")], &interner, "top");
        assert!(!result.has_errors);
        assert_eq!(result.design.modules.len(), 1);
    }

    #[test]
    fn pipeline_missing_top() {
        let interner = Interner::new();
        let result = full_pipeline(vec![], &interner, "top");
        assert!(result.has_errors);
        assert_eq!(result.error_count, 1);
        assert!(result.design.top.is_none());
    }
}
