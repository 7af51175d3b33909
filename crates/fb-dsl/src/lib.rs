//! Story file front end for Fabula.
//!
//! Source text is tokenized with `logos`, parsed by a hand-written
//! recursive-descent parser and compiled straight into an
//! [`fb_core::Universe`]. Compilation stops at the first error;
//! suspicious but legal input produces warning diagnostics.

/// Block parser and the compile output types.
pub mod compiler;
mod condition;
/// Warning and error reports rendered with ariadne.
pub mod diagnostics;
/// Compilation errors.
pub mod error;
/// Tokenizer for story source text.
pub mod lexer;
/// Source ranges and line/column positions.
pub mod span;

use std::path::Path;

pub use compiler::{Compilation, NarrativeBlock};
pub use diagnostics::{Diagnostic, Severity, render_diagnostics};
pub use error::{CompileError, CompileResult};

/// Compile story source text into a universe.
pub fn compile_source(source: &str) -> CompileResult<Compilation> {
    let compilation = compiler::Parser::new(source)?.compile()?;
    tracing::info!(
        factors = compilation.universe.factor_count(),
        transitions = compilation.universe.transition_count(),
        warnings = compilation.warnings.len(),
        "compiled story"
    );
    Ok(compilation)
}

/// Read and compile a story file.
pub fn compile_file(path: &Path) -> CompileResult<Compilation> {
    tracing::debug!(path = %path.display(), "reading story file");
    let source = std::fs::read_to_string(path)?;
    compile_source(&source)
}
