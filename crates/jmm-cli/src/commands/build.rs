//! `jmmc ollir` and `jmmc build`: lowering and Jasmin generation.

use anyhow::{Context, Result};
use jmm_engine::{Compiler, CompilerConfig, DiagnosticsFormat};
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;

use crate::output::StyledOutput;

/// Where generated text goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `<Class>.ollir` and `<Class>.j` in the output directory
    Files,
    Stdout,
}

pub fn execute(
    file: &Path,
    source: Option<&Path>,
    config: &CompilerConfig,
    target: Target,
    color: ColorChoice,
) -> Result<i32> {
    let program = super::read_program(file)?;
    let class_name = program
        .classes
        .first()
        .map(|class| class.name.clone())
        .unwrap_or_default();

    let output = Compiler::new(config.clone())
        .compile(&program)
        .with_context(|| format!("failed to compile {}", file.display()))?;

    let mut out = StyledOutput::new(color);
    super::report(&output.diagnostics, config.output.diagnostics_format, source, &mut out)?;

    let text_summary = config.output.diagnostics_format == DiagnosticsFormat::Text;
    let generated = [("ollir", &output.ollir), ("j", &output.jasmin)];

    if target == Target::Stdout {
        for (_, text) in generated {
            if let Some(text) = text {
                print!("{}", text);
            }
        }
    } else {
        let dir = config
            .output
            .dir
            .clone()
            .unwrap_or_else(|| super::input_dir(file));
        for (extension, text) in generated {
            if let Some(text) = text {
                let path = write_output(&dir, &class_name, extension, text)?;
                if text_summary {
                    out.success("wrote");
                    out.line(&format!(" {}", path.display()));
                }
            }
        }
    }

    if output.has_errors() {
        if text_summary {
            out.error(&format!("{} error(s)", output.diagnostics.len()));
            out.line("");
        }
        return Ok(1);
    }
    Ok(0)
}

fn write_output(dir: &Path, class_name: &str, extension: &str, text: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}.{}", class_name, extension));
    std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(path)
}
