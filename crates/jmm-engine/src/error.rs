//! Fatal compilation errors
//!
//! Semantic problems in user code are reported as diagnostics
//! (see [`crate::semantic::CheckError`]); the errors here abort compilation.

use crate::ast::Span;
use thiserror::Error;

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort compilation of a unit
#[derive(Debug, Error)]
pub enum CompileError {
    /// The input tree could not be read as JSON
    #[error("Invalid AST input: {0}")]
    Json(#[from] serde_json::Error),

    /// The input tree violates the node shape contract
    #[error("Malformed '{kind}' node at {span}: {message}")]
    MalformedAst {
        kind: String,
        message: String,
        span: Span,
    },

    /// The unit does not declare exactly one class
    #[error("Expected exactly one class declaration, found {found}")]
    ClassCount { found: usize },

    /// An earlier phase produced IR that a later phase cannot handle
    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompileError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        CompileError::InternalError {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(kind: &str, span: Span, message: impl Into<String>) -> Self {
        CompileError::MalformedAst {
            kind: kind.to_string(),
            message: message.into(),
            span,
        }
    }
}
