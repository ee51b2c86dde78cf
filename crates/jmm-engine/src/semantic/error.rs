//! Semantic errors
//!
//! Every violated rule produces one [`CheckError`]. They never abort
//! analysis; the pipeline collects them and turns them into diagnostics.

use crate::ast::Span;
use thiserror::Error;

/// Errors reported by the scope registry builder and the type checker
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// A vararg parameter that is not the last parameter
    #[error("Parameter '{param}' of method '{method}' can't be a vararg because it isn't the last parameter")]
    VarargNotLast {
        /// Method being declared
        method: String,
        /// Offending parameter
        param: String,
        span: Span,
    },

    /// A method return type declared with `...`
    #[error("Return type of method '{method}' can't be a vararg")]
    VarargReturnType { method: String, span: Span },

    /// A local variable declared with `...`
    #[error("Local variable '{name}' of method '{method}' can't be a vararg")]
    VarargLocal {
        method: String,
        name: String,
        span: Span,
    },

    /// A field declared with `...`
    #[error("Field '{name}' can't be a vararg")]
    VarargField { name: String, span: Span },

    /// `if`/`while` condition that is not boolean
    #[error("{construct} condition in method '{method}' must be boolean, found '{found}'")]
    NonBooleanCondition {
        /// `If` or `While`
        construct: &'static str,
        method: String,
        /// Inferred condition type
        found: String,
        span: Span,
    },

    /// Right-hand side not assignable to the target
    #[error("In method '{method}' '{target}' of type '{target_ty}' can't be assigned a value of type '{value_ty}'")]
    IncompatibleAssignment {
        method: String,
        /// Assigned variable
        target: String,
        target_ty: String,
        value_ty: String,
        span: Span,
    },

    /// Assignment to a field inside a static method
    #[error("In method '{method}' invalid assignment to field '{field}' from a static method")]
    StaticFieldAssignment {
        method: String,
        field: String,
        span: Span,
    },

    /// Return expression whose type could not be inferred
    #[error("Return statement of method '{method}' performs an invalid operation")]
    InvalidReturnOperation { method: String, span: Span },

    /// Return expression of the wrong type
    #[error("Return statement of method '{method}' returns '{found}', expected '{expected}'")]
    ReturnTypeMismatch {
        method: String,
        expected: String,
        found: String,
        span: Span,
    },

    /// `this` used inside a static method
    #[error("In method '{method}' invalid use of 'this' inside a static method")]
    ThisInStatic { method: String, span: Span },

    /// Call to a method the class does not declare
    #[error("Method '{callee}' called from '{caller}' was not found")]
    MethodNotFound {
        caller: String,
        callee: String,
        span: Span,
    },

    /// Actual arguments that do not reconcile with the formals
    #[error("Call from '{caller}' to '{callee}': number or type of the arguments doesn't match")]
    ArgumentMismatch {
        caller: String,
        callee: String,
        span: Span,
    },
}

/// Stable code of a semantic error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl CheckError {
    /// Location of the offending node
    pub fn span(&self) -> Span {
        use CheckError::*;
        match self {
            VarargNotLast { span, .. }
            | VarargReturnType { span, .. }
            | VarargLocal { span, .. }
            | VarargField { span, .. }
            | NonBooleanCondition { span, .. }
            | IncompatibleAssignment { span, .. }
            | StaticFieldAssignment { span, .. }
            | InvalidReturnOperation { span, .. }
            | ReturnTypeMismatch { span, .. }
            | ThisInStatic { span, .. }
            | MethodNotFound { span, .. }
            | ArgumentMismatch { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        use CheckError::*;
        match self {
            VarargNotLast { .. } => ErrorCode("E1001"),
            VarargReturnType { .. } => ErrorCode("E1002"),
            VarargLocal { .. } => ErrorCode("E1003"),
            VarargField { .. } => ErrorCode("E1004"),
            NonBooleanCondition { .. } => ErrorCode("E2001"),
            IncompatibleAssignment { .. } => ErrorCode("E2002"),
            StaticFieldAssignment { .. } => ErrorCode("E2003"),
            InvalidReturnOperation { .. } => ErrorCode("E2004"),
            ReturnTypeMismatch { .. } => ErrorCode("E2005"),
            ThisInStatic { .. } => ErrorCode("E2006"),
            MethodNotFound { .. } => ErrorCode("E2007"),
            ArgumentMismatch { .. } => ErrorCode("E2008"),
        }
    }
}
