pub mod check;
pub mod export;
pub mod play;

use std::path::Path;

use fb_dsl::{Compilation, Diagnostic, Severity, render_diagnostics};

/// Compile a story file and print its diagnostics to stderr.
/// Returns the compilation if there were no errors.
fn compile_file(path: &Path) -> Result<Compilation, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let filename = path.display().to_string();

    match fb_dsl::compile_source(&source) {
        Ok(compilation) => {
            print_diagnostics(&source, &filename, &compilation.warnings);
            Ok(compilation)
        }
        Err(e) => {
            print_diagnostics(&source, &filename, &[e.to_diagnostic()]);
            Err("compilation failed with errors".into())
        }
    }
}

/// Print diagnostics to stderr using ariadne, followed by a count line.
fn print_diagnostics(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let rendered = render_diagnostics(source, filename, diagnostics);
    eprint!("{rendered}");

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            plural(errors),
            warnings,
            plural(warnings),
        );
    } else {
        eprintln!("  {} warning{}", warnings, plural(warnings));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
