//! `jmmc check`: semantic analysis only.

use anyhow::Result;
use jmm_engine::{analyze, CompilerConfig};
use std::path::Path;
use termcolor::ColorChoice;

use crate::output::StyledOutput;

/// Returns the process exit code: 1 when any error was reported
pub fn execute(
    file: &Path,
    source: Option<&Path>,
    config: &CompilerConfig,
    color: ColorChoice,
) -> Result<i32> {
    let program = super::read_program(file)?;
    let analysis = analyze(&program)?;
    let diagnostics = analysis.diagnostics();

    let mut out = StyledOutput::new(color);
    super::report(&diagnostics, config.output.diagnostics_format, source, &mut out)?;

    if analysis.has_errors() {
        if config.output.diagnostics_format == jmm_engine::DiagnosticsFormat::Text {
            out.error(&format!("{} error(s)", diagnostics.len()));
            out.line("");
        }
        return Ok(1);
    }
    if config.output.diagnostics_format == jmm_engine::DiagnosticsFormat::Text {
        out.success("ok");
        out.line(&format!(" {}: no errors", analysis.table.class_name()));
    }
    Ok(0)
}
