//! Compiler back half: IR lowering, slot assignment and Jasmin generation
//!
//! # Pipeline
//!
//! ```text
//! Analysis + AST → lower → IrClass → slots → codegen → Jasmin
//!                            ↓
//!                       PrettyPrint → OLLIR
//! ```

pub mod codegen;
pub mod context;
pub mod ir;
pub mod lower;
pub mod slots;

pub use codegen::{generate, JasminGenerator};
pub use context::CompilationContext;
pub use ir::{IrClass, PrettyPrint};
pub use lower::lower_program;
pub use slots::assign_slots;
