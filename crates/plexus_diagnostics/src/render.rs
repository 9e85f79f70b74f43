//! Rendering of diagnostics into human-readable text.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use plexus_source::SourceDb;

/// Trait for rendering diagnostics into formatted output strings.
///
/// The elaborator only fills the sink; whoever drives the pipeline picks a
/// renderer for its output target.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E300]: duplicate declaration of `w`
///   --> src/top.v:10:5
///    |
/// 10 | wire w;
///    |      ^ redeclared here
///    |
///    = note: the first declaration wins
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        // Header line: severity[CODE]: message
        out.push_str(&format!(
            "{}[{}]: {}\n",
            diag.severity, diag.code, diag.message
        ));

        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("  --> {resolved}\n"));

            let file = source_db.get_file(diag.primary_span.file);
            let (line, col) = file.line_col(diag.primary_span.start);
            let line_num = format!("{line}");
            let padding = " ".repeat(line_num.len());

            let line_content = source_line(&file.content, diag.primary_span.start);

            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {line_content}\n"));

            // Underline with the primary label message, if any
            let span_len = (diag.primary_span.end - diag.primary_span.start).max(1) as usize;
            let carets = "^".repeat(span_len);
            let col_padding = " ".repeat((col as usize).saturating_sub(1));
            let primary_msg = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary)
                .map(|l| format!(" {}", l.message))
                .unwrap_or_default();

            out.push_str(&format!("{padding} | {col_padding}{carets}{primary_msg}\n"));

            // Secondary labels on their own location lines
            for label in diag
                .labels
                .iter()
                .filter(|l| l.style == LabelStyle::Secondary && !l.span.is_dummy())
            {
                let resolved = source_db.resolve_span(label.span);
                out.push_str(&format!("{padding} - {resolved}: {}\n", label.message));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Extracts the line of source text containing the given byte offset.
fn source_line(content: &str, byte_offset: u32) -> &str {
    let offset = byte_offset as usize;
    let start = content[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |pos| offset + pos);
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::label::Label;
    use plexus_source::Span;

    #[test]
    fn render_error_with_span() {
        let mut source_db = SourceDb::new();
        let file_id = source_db.add_source("top.v", "wire w;\nwire w;\n".to_string());

        let code = DiagnosticCode::new(Category::Error, 300);
        let span = Span::new(file_id, 13, 14);
        let prev = Span::new(file_id, 5, 6);
        let diag = Diagnostic::error(code, "duplicate declaration of `w`", span)
            .with_label(Label::primary(span, "redeclared here"))
            .with_label(Label::secondary(prev, "first declared here"));

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag, &source_db);

        assert!(output.contains("error[E300]: duplicate declaration of `w`"));
        assert!(output.contains("--> top.v:2:6"));
        assert!(output.contains("wire w;"));
        assert!(output.contains("^ redeclared here"));
        assert!(output.contains("top.v:1:6: first declared here"));
    }

    #[test]
    fn render_warning_with_notes() {
        let source_db = SourceDb::new();
        let code = DiagnosticCode::new(Category::Warning, 300);
        let diag = Diagnostic::warning(code, "implicit declaration of net `n`", Span::DUMMY)
            .with_note("`n` is used but never declared")
            .with_help("declare it as `wire n;`");

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag, &source_db);

        assert!(output.contains("warning[W300]: implicit declaration of net `n`"));
        assert!(output.contains("= note: `n` is used but never declared"));
        assert!(output.contains("= help: declare it as `wire n;`"));
    }

    #[test]
    fn render_dummy_span_no_source() {
        let source_db = SourceDb::new();
        let code = DiagnosticCode::new(Category::Resource, 301);
        let diag = Diagnostic::error(code, "specialization limit exceeded", Span::DUMMY);

        let renderer = TerminalRenderer::new(false);
        let output = renderer.render(&diag, &source_db);

        assert!(output.contains("error[R301]: specialization limit exceeded"));
        assert!(!output.contains("-->"));
    }
}
