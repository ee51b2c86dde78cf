//! Subcommand implementations and the helpers they share.

pub mod build;
pub mod check;

use anyhow::{bail, Context, Result};
use jmm_engine::semantic::diagnostic::{create_files, to_json_array};
use jmm_engine::{CompilerConfig, Diagnostic, DiagnosticsFormat, Program, RawNode};
use std::path::{Path, PathBuf};

use crate::output::StyledOutput;

/// Name of the configuration file looked up beside the input
pub const CONFIG_FILE: &str = "jmm.toml";

/// Load the configuration named on the command line, or `jmm.toml` in the
/// input's directory, or the defaults
pub fn load_config(explicit: Option<&Path>, input: &Path) -> Result<CompilerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let beside = input_dir(input).join(CONFIG_FILE);
            if !beside.is_file() {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                return Ok(CompilerConfig::default());
            }
            beside
        }
    };
    tracing::debug!(path = %path.display(), "loading configuration");
    CompilerConfig::from_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

pub fn parse_format(value: &str) -> Result<DiagnosticsFormat> {
    match value {
        "text" => Ok(DiagnosticsFormat::Text),
        "json" => Ok(DiagnosticsFormat::Json),
        other => bail!("unknown diagnostics format '{}' (expected text or json)", other),
    }
}

/// Read and convert the parser's JSON tree
pub fn read_program(path: &Path) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let program = RawNode::from_json(&text)
        .and_then(|node| node.to_program())
        .with_context(|| format!("invalid syntax tree in {}", path.display()))?;
    Ok(program)
}

/// Directory outputs go to when none is configured
pub fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Print diagnostics in the configured format
///
/// Text diagnostics are annotated with source context when `source` is
/// given; JSON goes to stdout as one array.
pub fn report(
    diagnostics: &[Diagnostic],
    format: DiagnosticsFormat,
    source: Option<&Path>,
    out: &mut StyledOutput,
) -> Result<()> {
    match format {
        DiagnosticsFormat::Json => {
            out.line(&to_json_array(diagnostics)?);
        }
        DiagnosticsFormat::Text => match source {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let (files, id) = create_files(path, text);
                for diagnostic in diagnostics {
                    diagnostic
                        .emit(out.stderr(), &files, id)
                        .context("failed to render diagnostic")?;
                }
            }
            None => diagnostics.iter().for_each(|d| out.diagnostic(d)),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_beside_input() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[codegen]\nincrement_fusion = false\n\n[output]\ndiagnostics_format = \"json\"\n",
        )
        .unwrap();
        let input = dir.path().join("Main.json");

        let config = load_config(None, &input).unwrap();
        assert!(!config.codegen.increment_fusion);
        assert!(config.codegen.emit_jasmin);
        assert_eq!(config.output.diagnostics_format, DiagnosticsFormat::Json);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, &dir.path().join("Main.json")).unwrap();
        assert_eq!(config, CompilerConfig::default());
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[codegen\n").unwrap();
        let err = load_config(Some(&path), &dir.path().join("Main.json")).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn test_read_program() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Main.json");
        fs::write(
            &path,
            r#"{"kind": "Program", "children": [
                {"kind": "ClassDecl", "attributes": {"name": "Main"}, "children": []}
            ]}"#,
        )
        .unwrap();
        let program = read_program(&path).unwrap();
        assert_eq!(program.classes[0].name, "Main");

        fs::write(&path, "{").unwrap();
        assert!(read_program(&path).is_err());
    }

    #[test]
    fn test_input_dir() {
        assert_eq!(input_dir(Path::new("Main.json")), PathBuf::from("."));
        assert_eq!(input_dir(Path::new("src/Main.json")), PathBuf::from("src"));
    }
}
