//! Jmm Compiler Engine
//!
//! This crate provides the middle and back end of the Jmm compiler:
//! - **AST**: Typed tree built from the parser's kind-tagged nodes (`ast` module)
//! - **Semantic**: Symbol table, scope registry and type checker (`semantic` module)
//! - **Compiler**: OLLIR lowering, slot assignment and Jasmin generation (`compiler` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use jmm_engine::{Compiler, CompilerConfig, RawNode};
//!
//! let program = RawNode::from_json(&json)?.to_program()?;
//! let output = Compiler::new(CompilerConfig::default()).compile(&program)?;
//! for diagnostic in &output.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! if let Some(jasmin) = output.jasmin {
//!     std::fs::write("Main.j", jasmin)?;
//! }
//! ```

#![warn(rust_2018_idioms)]
#![allow(clippy::new_without_default)]

/// AST module: typed program tree and the raw-node converter
pub mod ast;

/// Semantic module: symbol table, scopes, type checking, diagnostics
pub mod semantic;

/// Compiler module: IR, lowering, slots and Jasmin code generation
pub mod compiler;

/// Configuration loaded from `jmm.toml`
pub mod config;

/// Fatal compilation errors
pub mod error;

/// End-to-end compilation driver
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use ast::{Program, RawNode, Span};
pub use compiler::{ir, CompilationContext, IrClass, PrettyPrint};
pub use config::{CompilerConfig, ConfigError, DiagnosticsFormat};
pub use error::{CompileError, CompileResult};
pub use pipeline::{CompileOutput, Compiler};
pub use semantic::{analyze, Analysis, CheckError, Diagnostic, Severity};
