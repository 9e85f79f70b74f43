//! Diagnostic codes and helper functions for elaboration errors and warnings.
//!
//! Error codes `E300`--`E311` cover semantic elaboration failures (duplicate
//! declarations, unresolved modules, binding mismatches, malformed loops).
//! Warning codes `W300`--`W301` cover recoverable issues. Resource codes
//! `R300`--`R301` report configured limit exhaustion; the affected drain
//! stops but a partial design is still produced.

use plexus_diagnostics::{Category, Diagnostic, DiagnosticCode, Label};
use plexus_ir::SymbolKind;
use plexus_source::Span;

/// Duplicate declaration within a scope.
pub const E300: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 300,
};

/// Instantiation of an undefined module.
pub const E301: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 301,
};

/// Port count mismatch in an instantiation.
pub const E302: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 302,
};

/// Named connection to an unknown port.
pub const E303: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 303,
};

/// Parameter count mismatch in an instantiation.
pub const E304: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 304,
};

/// Named override of an unknown parameter.
pub const E305: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 305,
};

/// Parameter value that does not reduce to a constant.
pub const E306: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 306,
};

/// Malformed for-loop shape.
pub const E307: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 307,
};

/// Loop bound or step that does not reduce to a constant.
pub const E308: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 308,
};

/// Reg initializer that stays non-constant after elaboration.
pub const E309: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 309,
};

/// Duplicate module definition across the design.
pub const E310: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 310,
};

/// Top module not found.
pub const E311: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 311,
};

/// Implicit net synthesized for an undeclared reference.
pub const W300: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 300,
};

/// Case statement with a constant selector and no matching item.
pub const W301: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 301,
};

/// Loop unroll iteration cap exceeded.
pub const R300: DiagnosticCode = DiagnosticCode {
    category: Category::Resource,
    number: 300,
};

/// Specialization cap exceeded.
pub const R301: DiagnosticCode = DiagnosticCode {
    category: Category::Resource,
    number: 301,
};

/// Creates a diagnostic for a duplicate declaration. The span of the
/// surviving first declaration is attached as a secondary label.
pub fn error_duplicate_declaration(
    kind: SymbolKind,
    name: &str,
    span: Span,
    prev_span: Span,
) -> Diagnostic {
    Diagnostic::error(E300, format!("duplicate {} `{name}`", kind.noun()), span)
        .with_label(Label::secondary(prev_span, "first declared here"))
        .with_note("the first declaration wins")
}

/// Creates a diagnostic for an instantiation of an undefined module.
pub fn error_undefined_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E301, format!("undefined module `{name}`"), span)
        .with_help("check that the module is part of the parsed design")
}

/// Creates a diagnostic for a port count mismatch.
pub fn error_port_count(module: &str, expected: usize, found: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E302,
        format!("module `{module}` has {expected} ports, {found} connections given"),
        span,
    )
}

/// Creates a diagnostic for a named connection to an unknown port.
pub fn error_unknown_port(port: &str, module: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E303,
        format!("unknown port `{port}` on module `{module}`"),
        span,
    )
}

/// Creates a diagnostic for a parameter count mismatch.
pub fn error_param_count(module: &str, expected: usize, found: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E304,
        format!("module `{module}` has {expected} parameters, {found} overrides given"),
        span,
    )
}

/// Creates a diagnostic for a named override of an unknown parameter.
pub fn error_unknown_parameter(param: &str, module: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E305,
        format!("unknown parameter `{param}` on module `{module}`"),
        span,
    )
}

/// Creates a diagnostic for a parameter that does not reduce to a constant.
pub fn error_nonconstant_parameter(param: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E306,
        format!("parameter `{param}` does not reduce to a constant"),
        span,
    )
    .with_help("parameter values may only reference constants and other parameters")
}

/// Creates a diagnostic for a malformed for loop.
pub fn error_malformed_for(reason: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E307, format!("malformed for loop: {reason}"), span).with_note(
        "the initializer and step must assign the same single loop variable",
    )
}

/// Creates a diagnostic for a non-constant loop bound, condition, or step.
pub fn error_nonconstant_bound(what: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E308,
        format!("loop {what} does not reduce to a constant"),
        span,
    )
    .with_help("for loops are unrolled at elaboration time and need constant bounds")
}

/// Creates a diagnostic for a reg initializer that stays non-constant.
pub fn error_reg_initializer(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E309,
        format!("initializer of reg `{name}` does not reduce to a constant"),
        span,
    )
    .with_note("the initializer is dropped; the declaration is kept")
}

/// Creates a diagnostic for a duplicate module definition.
pub fn error_duplicate_module(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E310, format!("duplicate module `{name}`"), span)
        .with_label(Label::secondary(prev_span, "previously defined here"))
}

/// Creates a diagnostic for a missing top module.
pub fn error_missing_top(name: &str) -> Diagnostic {
    Diagnostic::error(E311, format!("top module `{name}` not found"), Span::DUMMY)
        .with_help("set `project.top` in plexus.toml to the name of an existing module")
}

/// Creates a warning for an implicitly declared net.
pub fn warn_implicit_net(name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W300,
        format!("implicit declaration of net `{name}`"),
        span,
    )
    .with_note("a 1-bit net is synthesized at module scope")
}

/// Creates a warning for a constant case selector matching no item.
pub fn warn_case_no_match(span: Span) -> Diagnostic {
    Diagnostic::warning(W301, "case selector matches no item", span)
        .with_note("the statement is removed")
}

/// Creates a resource diagnostic for the unroll cap.
pub fn error_unroll_cap(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        R300,
        format!("loop exceeds the unroll cap of {limit} iterations"),
        span,
    )
    .with_help("raise `elaboration.max_unroll_iterations` in plexus.toml if intended")
}

/// Creates a resource diagnostic for the specialization cap.
pub fn error_specialization_cap(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        R301,
        format!("design exceeds the specialization cap of {limit} modules"),
        span,
    )
    .with_note("a hierarchy cycle with changing parameters never terminates")
    .with_help("raise `elaboration.max_specializations` in plexus.toml if intended")
}
