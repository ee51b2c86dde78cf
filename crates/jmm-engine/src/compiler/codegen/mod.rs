//! Code Generation from IR to Jasmin
//!
//! This module transforms register-allocated IR into Jasmin assembly text.
//!
//! # Pipeline
//!
//! ```text
//! IrClass (+ VarTable per method) → JasminGenerator → Jasmin text
//! ```
//!
//! Operand stack depth is tracked per method and reported as
//! `.limit stack`; `.limit locals` comes from the variable table.

mod context;
pub mod emit;

pub use context::JasminGenerator;

use crate::compiler::ir::IrClass;
use crate::config::CodegenConfig;
use crate::error::CompileResult;

/// Generate Jasmin text for a class whose methods carry variable tables
pub fn generate(class: &IrClass, config: &CodegenConfig) -> CompileResult<String> {
    JasminGenerator::new(class, config.increment_fusion).generate()
}
