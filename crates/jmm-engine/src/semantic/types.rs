//! Semantic types
//!
//! A closed sum type replaces string type names: the sentinels for failed
//! inference, imported values, and array creation are their own variants.

use crate::ast::TypeAnnotation;
use std::fmt;

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int,
    Boolean,
    Void,
    String,
}

impl PrimitiveType {
    /// Parse a source type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(PrimitiveType::Int),
            "boolean" => Some(PrimitiveType::Boolean),
            "void" => Some(PrimitiveType::Void),
            "String" => Some(PrimitiveType::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Void => "void",
            PrimitiveType::String => "String",
        }
    }
}

/// Type of a declaration or an expression
///
/// Vararg-ness is not part of a type; it is carried by the declaring
/// [`Symbol`](super::Symbol) so that `int...` and `int` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `int`, `boolean`, `void`, `String`
    Primitive(PrimitiveType),

    /// Class type (the compiled class, its superclass, or an imported class)
    Named(String),

    /// `T[]`
    ArrayOf(Box<Type>),

    /// Inference failed
    Error,

    /// Value of an imported package that cannot be analyzed further
    Imported,

    /// Result of `new int[n]`
    NewArray,

    /// Result of an array literal whose elements are all integer literals
    ArrayInit,
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn void() -> Self {
        Type::Primitive(PrimitiveType::Void)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn array_of(element: Type) -> Self {
        Type::ArrayOf(Box::new(element))
    }

    /// Resolve a declared type (`T`, `T[]`; a vararg `T...` stays `T`)
    pub fn from_annotation(annotation: &TypeAnnotation) -> Self {
        let base = match PrimitiveType::from_name(&annotation.name) {
            Some(prim) => Type::Primitive(prim),
            None => Type::Named(annotation.name.clone()),
        };
        if annotation.is_array {
            Type::array_of(base)
        } else {
            base
        }
    }

    /// Base name: the element name for arrays, the sentinel name otherwise
    pub fn name(&self) -> String {
        match self {
            Type::Primitive(prim) => prim.as_str().to_string(),
            Type::Named(name) => name.clone(),
            Type::ArrayOf(element) => element.name(),
            Type::Error => "error".to_string(),
            Type::Imported => "Imported".to_string(),
            Type::NewArray => "newArray".to_string(),
            Type::ArrayInit => "arrayInit".to_string(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::ArrayOf(_) | Type::NewArray | Type::ArrayInit)
    }

    /// Element type of an array type
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Type::ArrayOf(element) => Some((**element).clone()),
            Type::NewArray | Type::ArrayInit => Some(Type::int()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Int))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Boolean))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveType::Void))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::ArrayOf(element) => write!(f, "{}[]", element),
            other => f.write_str(&other.name()),
        }
    }
}
