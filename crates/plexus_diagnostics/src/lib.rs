//! Structured diagnostics for the elaboration engine.
//!
//! The engine never prints: every error and warning is a [`Diagnostic`]
//! (severity, code, message, spans, optional labels/notes/help) emitted into
//! an injected [`DiagnosticSink`]. Whoever drives the pipeline drains the
//! sink and renders with a [`DiagnosticRenderer`].
//!
//! Codes carry a category letter: `E` for errors, `W` for warnings, and `R`
//! for resource exhaustion (unroll and specialization caps), which the
//! elaborator surfaces distinctly from ordinary semantic errors.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod render;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use render::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
