//! IR instructions

use super::value::{Element, IrType};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    LessThan,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::LessThan => "<",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl From<crate::ast::BinaryOperator> for BinaryOp {
    fn from(op: crate::ast::BinaryOperator) -> Self {
        use crate::ast::BinaryOperator;
        match op {
            BinaryOperator::Add => BinaryOp::Add,
            BinaryOperator::Subtract => BinaryOp::Sub,
            BinaryOperator::Multiply => BinaryOp::Mul,
            BinaryOperator::Divide => BinaryOp::Div,
            BinaryOperator::LessThan => BinaryOp::LessThan,
            BinaryOperator::And => BinaryOp::And,
            BinaryOperator::Or => BinaryOp::Or,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
}

/// The five call forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    New,
    ArrayLength,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::InvokeVirtual => "invokevirtual",
            CallKind::InvokeStatic => "invokestatic",
            CallKind::InvokeSpecial => "invokespecial",
            CallKind::New => "new",
            CallKind::ArrayLength => "arraylength",
        }
    }
}

/// A call-like instruction
///
/// `New` with a `ClassRef("array")` caller allocates an array whose size is
/// the single argument.
#[derive(Debug, Clone, PartialEq)]
pub struct CallInstr {
    pub kind: CallKind,
    pub caller: Element,
    pub method: Option<String>,
    pub args: Vec<Element>,
    pub ret: IrType,
}

impl CallInstr {
    pub fn is_array_new(&self) -> bool {
        self.kind == CallKind::New && matches!(&self.caller, Element::ClassRef(name) if name == "array")
    }
}

/// Three-address instructions
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `dest :=.T rhs`
    Assign {
        dest: Element,
        ty: IrType,
        rhs: Box<Instruction>,
    },

    /// A lone operand used as a value
    Single(Element),

    /// `lhs op.T rhs`; `ty` is the result type
    Binary {
        op: BinaryOp,
        lhs: Element,
        rhs: Element,
        ty: IrType,
    },

    Unary {
        op: UnaryOp,
        operand: Element,
        ty: IrType,
    },

    Call(CallInstr),

    GetField {
        object: Element,
        field: String,
        ty: IrType,
    },

    PutField {
        object: Element,
        field: String,
        ty: IrType,
        value: Element,
    },

    /// `if (cond) goto label`
    Branch {
        cond: Box<Instruction>,
        label: String,
    },

    Goto(String),

    Return {
        ty: IrType,
        value: Option<Element>,
    },
}

impl Instruction {
    pub fn single(element: Element) -> Self {
        Instruction::Single(element)
    }

    /// Type of the value this instruction produces
    pub fn result_type(&self) -> IrType {
        match self {
            Instruction::Assign { ty, .. }
            | Instruction::Binary { ty, .. }
            | Instruction::Unary { ty, .. }
            | Instruction::GetField { ty, .. } => ty.clone(),
            Instruction::Single(element) => element.ty(),
            Instruction::Call(call) => call.ret.clone(),
            Instruction::PutField { .. }
            | Instruction::Branch { .. }
            | Instruction::Goto(_)
            | Instruction::Return { .. } => IrType::Void,
        }
    }

    /// The element if this is a lone operand
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Instruction::Single(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for CallInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CallKind::New => {
                write!(f, "new({}", self.caller)?;
                for arg in &self.args {
                    write!(f, ", {}", arg)?;
                }
                write!(f, ").{}", self.ret)
            }
            CallKind::ArrayLength => write!(f, "arraylength({}).{}", self.caller, self.ret),
            kind => {
                write!(f, "{}({}", kind.as_str(), self.caller)?;
                if let Some(method) = &self.method {
                    write!(f, ", \"{}\"", method)?;
                }
                for arg in &self.args {
                    write!(f, ", {}", arg)?;
                }
                write!(f, ").{}", self.ret)
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign { dest, ty, rhs } => write!(f, "{} :=.{} {}", dest, ty, rhs),
            Instruction::Single(element) => write!(f, "{}", element),
            Instruction::Binary { op, lhs, rhs, ty } => {
                write!(f, "{} {}.{} {}", lhs, op.as_str(), ty, rhs)
            }
            Instruction::Unary {
                op: UnaryOp::Not,
                operand,
                ty,
            } => write!(f, "!.{} {}", ty, operand),
            Instruction::Call(call) => write!(f, "{}", call),
            Instruction::GetField { object, field, ty } => {
                write!(f, "getfield({}, {}.{}).{}", object, field, ty, ty)
            }
            Instruction::PutField {
                object,
                field,
                ty,
                value,
            } => write!(f, "putfield({}, {}.{}, {}).V", object, field, ty, value),
            Instruction::Branch { cond, label } => write!(f, "if ({}) goto {}", cond, label),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::Return { ty, value: Some(value) } => write!(f, "ret.{} {}", ty, value),
            Instruction::Return { ty, value: None } => write!(f, "ret.{}", ty),
        }
    }
}
