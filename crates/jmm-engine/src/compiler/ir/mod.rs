//! Intermediate Representation (IR)
//!
//! A structured three-address code with a textual form (OLLIR).
//!
//! # Structure
//!
//! - `IrClass` - The compiled class: imports, fields, methods
//! - `IrMethod` - Ordered instructions, a label map and a variable table
//! - `Instruction` - Three-address instructions
//! - `Element` - Typed operands and literals

pub mod instr;
pub mod method;
pub mod module;
pub mod pretty;
pub mod value;

pub use instr::{BinaryOp, CallInstr, CallKind, Instruction, UnaryOp};
pub use method::{IrItem, IrMethod, VarDescriptor, VarScope, VarTable};
pub use module::{IrClass, IrField};
pub use pretty::PrettyPrint;
pub use value::{Element, IrType};
