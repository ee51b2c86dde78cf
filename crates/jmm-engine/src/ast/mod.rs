//! Abstract Syntax Tree (AST) for Jmm programs.
//!
//! The external parser hands back a generic kind-tagged tree (see [`raw`]);
//! it is converted once into the closed, typed model defined here:
//! - Program structure (imports, the class declaration, members)
//! - Statements (assignment, branches, loops, return)
//! - Expressions (literals, operators, calls, arrays)
//!
//! Every node carries a [`Span`] with the line and column reported by the parser.

pub mod build;
pub mod expression;
pub mod raw;
pub mod statement;

pub use expression::*;
pub use raw::RawNode;
pub use statement::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a node (1-indexed, `0` when unknown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Root node: one compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Import declarations, in source order
    pub imports: Vec<ImportDecl>,

    /// Class declarations; a well-formed unit has exactly one
    pub classes: Vec<ClassDecl>,

    pub span: Span,
}

impl Program {
    /// Create a new program
    pub fn new(imports: Vec<ImportDecl>, classes: Vec<ClassDecl>) -> Self {
        Self {
            imports,
            classes,
            span: Span::default(),
        }
    }
}

/// `import a.b.C;`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Path segments (`["a", "b", "C"]`)
    pub path: Vec<String>,
    pub span: Span,
}

impl ImportDecl {
    /// Dot-joined import path
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// Class declaration with its fields and methods
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,

    /// Superclass name from the `extends` clause
    pub extends: Option<String>,

    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

/// Variable declaration (field or method local)
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeAnnotation,
    pub is_private: bool,
    pub span: Span,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    pub return_type: TypeAnnotation,
    pub params: Vec<Param>,

    /// Local variable declarations, in source order
    pub locals: Vec<VarDecl>,

    pub body: Vec<Statement>,
    pub span: Span,
}

impl MethodDecl {
    /// True if any top-level statement of the body is a `return`
    pub fn has_return(&self) -> bool {
        self.body.iter().any(|stmt| matches!(stmt, Statement::Return(_)))
    }
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeAnnotation,
    pub span: Span,
}

/// Declared type as written: `int`, `int[]`, `int...`, `Foo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    /// Element name for arrays, type name otherwise
    pub name: String,
    pub is_array: bool,
    pub is_vararg: bool,
    pub span: Span,
}

impl TypeAnnotation {
    /// Scalar type
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            is_vararg: false,
            span: Span::default(),
        }
    }

    /// Array type (`T[]`)
    pub fn array_of(name: impl Into<String>) -> Self {
        Self {
            is_array: true,
            ..Self::named(name)
        }
    }

    /// Vararg type (`T...`)
    pub fn vararg(name: impl Into<String>) -> Self {
        Self {
            is_vararg: true,
            ..Self::named(name)
        }
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_array {
            write!(f, "[]")?;
        }
        if self.is_vararg {
            write!(f, "...")?;
        }
        Ok(())
    }
}
