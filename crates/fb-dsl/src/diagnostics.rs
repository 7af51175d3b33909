use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt;

use crate::span::Span;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Compilation failed.
    Error,
    /// Legal but suspicious input.
    Warning,
}

/// A compiler message attached to a source range.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Source range the report points at.
    pub span: Span,
    /// Headline message.
    pub message: String,
    /// Text attached to the highlighted range (defaults to the message).
    pub label: Option<String>,
    /// Trailing hint.
    pub note: Option<String>,
}

impl Diagnostic {
    /// An error at `span`.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, span, message)
    }

    /// A warning at `span`.
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, span, message)
    }

    fn new(severity: Severity, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity,
            span,
            message: message.into(),
            label: None,
            note: None,
        }
    }

    /// Set the text shown next to the highlighted range.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a trailing hint, e.g. a spelling suggestion.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether this diagnostic aborts compilation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Render diagnostics with ariadne for terminal output.
pub fn render_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let (kind, color) = match diag.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let span = (filename, diag.span.clone());
        let mut report = Report::build(kind, span.clone()).with_message(&diag.message);

        let label_text = diag.label.as_deref().unwrap_or(&diag.message);
        report = report.with_label(Label::new(span).with_message(label_text).with_color(color));
        if let Some(note) = &diag.note {
            report = report.with_note(note);
        }

        report
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}
