//! Semantic analysis
//!
//! Runs in three passes, each consuming the completed output of the last:
//!
//! 1. [`SymbolTable::build`] collects class-level facts
//! 2. [`ScopeRegistry::build`] catalogues every variable and validates varargs
//! 3. [`TypeChecker`] infers expression types and validates statements
//!
//! Rule violations are accumulated as [`CheckError`]s; only a malformed unit
//! (not exactly one class) aborts analysis.

pub mod assignability;
pub mod checker;
pub mod diagnostic;
pub mod error;
pub mod resolve;
pub mod scope;
pub mod symbols;
pub mod types;

pub use assignability::{can_assign, is_external, reconcile_arguments};
pub use checker::TypeChecker;
pub use diagnostic::{Diagnostic, Severity, Stage};
pub use error::{CheckError, ErrorCode};
pub use resolve::TypeResolver;
pub use scope::{ScopeEntry, ScopeKind, ScopeRegistry};
pub use symbols::{MethodSignature, Symbol, SymbolTable};
pub use types::{PrimitiveType, Type};

use crate::ast::Program;
use crate::error::CompileResult;

/// Completed semantic analysis of one unit
#[derive(Debug, Clone)]
pub struct Analysis {
    pub table: SymbolTable,
    pub scopes: ScopeRegistry,
    /// Registry errors first, then checker errors
    pub errors: Vec<CheckError>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors as diagnostics, in report order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(Diagnostic::from_check_error).collect()
    }
}

/// Analyze a program
pub fn analyze(program: &Program) -> CompileResult<Analysis> {
    let table = SymbolTable::build(program)?;
    let (scopes, mut errors) = ScopeRegistry::build(&table, program);
    errors.extend(TypeChecker::new(&table, &scopes).check_program(program));

    tracing::debug!(class = %table.class_name(), errors = errors.len(), "semantic analysis finished");
    Ok(Analysis {
        table,
        scopes,
        errors,
    })
}
