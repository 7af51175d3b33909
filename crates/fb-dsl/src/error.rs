use fb_core::CoreError;
use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::span::{Position, Span};

/// Result alias for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort compilation of a story file.
///
/// Compilation stops at the first error; everything recoverable is reported
/// as a warning [`Diagnostic`] instead.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Unexpected token or malformed literal.
    #[error("{position}: expected {expected}, found {found}")]
    Syntax {
        /// What the parser was looking for.
        expected: String,
        /// What it got instead.
        found: String,
        /// Range of the offending token.
        span: Span,
        /// Start of `span` as line and column.
        position: Position,
    },

    /// A factor used before (or without) being declared.
    #[error("{position}: undefined factor `{name}`{}", did_you_mean(.suggestion))]
    UndefinedFactor {
        /// The name as written.
        name: String,
        /// Range of the name.
        span: Span,
        /// Start of `span` as line and column.
        position: Position,
        /// The closest declared factor name, if one is similar enough.
        suggestion: Option<String>,
    },

    /// A second `factor` block with an existing name.
    #[error("{position}: factor `{name}` is already declared")]
    DuplicateFactor {
        /// The repeated name.
        name: String,
        /// Range of the second declaration's name.
        span: Span,
        /// Start of `span` as line and column.
        position: Position,
    },

    /// A factor without values.
    #[error("{position}: factor `{name}` has no values")]
    EmptyFactor {
        /// The factor's name.
        name: String,
        /// Range of the name.
        span: Span,
        /// Start of `span` as line and column.
        position: Position,
    },

    /// The model rejected a declaration.
    #[error("invalid story model: {0}")]
    Model(#[from] CoreError),

    /// The story file could not be read.
    #[error("cannot read story file: {0}")]
    Io(#[from] std::io::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean `{s}`?)"))
        .unwrap_or_default()
}

impl CompileError {
    pub(crate) fn syntax(
        source: &str,
        span: Span,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            expected: expected.into(),
            found: found.into(),
            position: Position::locate(source, span.start),
            span,
        }
    }

    /// Source range of the error, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. }
            | Self::UndefinedFactor { span, .. }
            | Self::DuplicateFactor { span, .. }
            | Self::EmptyFactor { span, .. } => Some(span.clone()),
            Self::Model(_) | Self::Io(_) => None,
        }
    }

    /// Convert into a renderable diagnostic. Position prefixes are dropped,
    /// the renderer shows the location itself.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Syntax {
                expected,
                found,
                span,
                ..
            } => Diagnostic::error(span.clone(), format!("expected {expected}, found {found}"))
                .with_label(format!("unexpected {found}")),
            Self::UndefinedFactor {
                name,
                span,
                suggestion,
                ..
            } => {
                let diag = Diagnostic::error(span.clone(), format!("undefined factor `{name}`"))
                    .with_label("factors must be declared before they are used");
                match suggestion {
                    Some(s) => diag.with_note(format!("did you mean `{s}`?")),
                    None => diag,
                }
            }
            Self::DuplicateFactor { name, span, .. } => {
                Diagnostic::error(span.clone(), format!("factor `{name}` is already declared"))
                    .with_label("second declaration here")
            }
            Self::EmptyFactor { name, span, .. } => {
                Diagnostic::error(span.clone(), format!("factor `{name}` has no values"))
            }
            Self::Model(_) | Self::Io(_) => Diagnostic::error(0..0, self.to_string()),
        }
    }
}
