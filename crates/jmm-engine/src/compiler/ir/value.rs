//! IR types and operands

use crate::semantic::{PrimitiveType, Type};
use std::fmt;

/// Type suffix carried by every IR value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Int32,
    Boolean,
    Void,
    String,
    Class(String),
    Array(Box<IrType>),
}

impl IrType {
    pub fn int_array() -> Self {
        IrType::Array(Box::new(IrType::Int32))
    }

    /// Map a semantic type; vararg-bound names are int arrays
    pub fn from_type(ty: &Type, is_vararg: bool) -> Self {
        let base = match ty {
            Type::Primitive(PrimitiveType::Int) => IrType::Int32,
            Type::Primitive(PrimitiveType::Boolean) => IrType::Boolean,
            Type::Primitive(PrimitiveType::Void) => IrType::Void,
            Type::Primitive(PrimitiveType::String) => IrType::String,
            Type::Named(name) => IrType::Class(name.clone()),
            Type::ArrayOf(element) => IrType::Array(Box::new(IrType::from_type(element, false))),
            Type::NewArray | Type::ArrayInit => IrType::int_array(),
            Type::Error | Type::Imported => IrType::Void,
        };
        if is_vararg && !base.is_array() {
            IrType::Array(Box::new(base))
        } else {
            base
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, IrType::Array(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, IrType::Void)
    }

    /// True for types stored with `astore`/returned with `areturn`
    pub fn is_reference(&self) -> bool {
        matches!(self, IrType::String | IrType::Class(_) | IrType::Array(_))
    }

    pub fn element(&self) -> Option<&IrType> {
        match self {
            IrType::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Int32 => write!(f, "i32"),
            IrType::Boolean => write!(f, "bool"),
            IrType::Void => write!(f, "V"),
            IrType::String => write!(f, "String"),
            IrType::Class(name) => write!(f, "{}", name),
            IrType::Array(element) => write!(f, "array.{}", element),
        }
    }
}

/// An operand of an IR instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `5.i32`, `1.bool`
    Literal { value: i32, ty: IrType },

    /// `x.i32`
    Operand { name: String, ty: IrType },

    /// `a.array.i32[i.i32].i32`; `ty` is the element type
    ArrayOperand {
        name: String,
        index: Box<Element>,
        ty: IrType,
    },

    /// The receiver of the enclosing class
    This { class: String },

    /// A class or package named directly, printed without a type suffix
    ClassRef(String),
}

impl Element {
    pub fn int(value: i32) -> Self {
        Element::Literal {
            value,
            ty: IrType::Int32,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Element::Literal {
            value: i32::from(value),
            ty: IrType::Boolean,
        }
    }

    pub fn operand(name: impl Into<String>, ty: IrType) -> Self {
        Element::Operand {
            name: name.into(),
            ty,
        }
    }

    /// Type of the value this element denotes
    pub fn ty(&self) -> IrType {
        match self {
            Element::Literal { ty, .. }
            | Element::Operand { ty, .. }
            | Element::ArrayOperand { ty, .. } => ty.clone(),
            Element::This { class } => IrType::Class(class.clone()),
            Element::ClassRef(name) => IrType::Class(name.clone()),
        }
    }

    /// Variable name, for elements stored in a local slot
    pub fn name(&self) -> Option<&str> {
        match self {
            Element::Operand { name, .. } | Element::ArrayOperand { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<i32> {
        match self {
            Element::Literal { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Literal { value, ty } => write!(f, "{}.{}", value, ty),
            Element::Operand { name, ty } => write!(f, "{}.{}", name, ty),
            Element::ArrayOperand { name, index, ty } => {
                write!(f, "{}.array.{}[{}].{}", name, ty, index, ty)
            }
            Element::This { .. } => write!(f, "this"),
            Element::ClassRef(name) => write!(f, "{}", name),
        }
    }
}
