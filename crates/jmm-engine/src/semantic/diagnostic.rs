//! Diagnostic reports
//!
//! Semantic errors become [`Diagnostic`]s: `{severity, stage, line, column,
//! message}` plus a stable code. They can be rendered as plain text, as JSON
//! for tooling, or through codespan-reporting when the source text is known.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::WriteColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::error::{CheckError, ErrorCode};
use crate::ast::Span;

/// Severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Compiler stage that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stage {
    Semantic,
}

/// A located report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    /// 1-indexed line, `0` when unknown
    pub line: u32,
    /// 1-indexed column, `0` when unknown
    pub column: u32,
    pub message: String,
    /// Error code (e.g., "E2001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    /// Create a semantic error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage: Stage::Semantic,
            line: 0,
            column: 0,
            message: message.into(),
            code: None,
        }
    }

    /// Set the location
    pub fn at(mut self, span: Span) -> Self {
        self.line = span.line;
        self.column = span.column;
        self
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.as_str().to_string());
        self
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError) -> Self {
        Diagnostic::error(error.to_string())
            .at(error.span())
            .with_code(error.code())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert to JSON representation for tooling
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to a codespan diagnostic pointing at `line:column` of `file_id`
    pub fn to_codespan(&self, files: &SimpleFiles<String, String>, file_id: usize) -> CsDiagnostic<usize> {
        let severity = match self.severity {
            Severity::Error => codespan_reporting::diagnostic::Severity::Error,
            Severity::Warning => codespan_reporting::diagnostic::Severity::Warning,
        };
        let mut diag = CsDiagnostic::new(severity).with_message(&self.message);
        if let Some(code) = &self.code {
            diag = diag.with_code(code);
        }

        if self.line > 0 {
            if let Ok(range) = files.line_range(file_id, self.line as usize - 1) {
                let offset = (self.column.max(1) as usize - 1).min(range.len());
                let start = range.start + offset;
                let end = (start + 1).min(range.end).max(start);
                diag = diag.with_labels(vec![Label::primary(file_id, start..end)]);
            }
        }
        diag
    }

    /// Render with source context
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
        file_id: usize,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.to_codespan(files, file_id))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.code {
            Some(code) => write!(f, "{}[{}]", severity, code)?,
            None => write!(f, "{}", severity)?,
        }
        write!(f, " {}:{}: {}", self.line, self.column, self.message)
    }
}

/// Serialize a list of diagnostics as a JSON array
pub fn to_json_array(diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(diagnostics)
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> (SimpleFiles<String, String>, usize) {
    let mut files = SimpleFiles::new();
    let id = files.add(path.into().display().to_string(), source.into());
    (files, id)
}
