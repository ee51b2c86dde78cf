//! Expression AST nodes
//!
//! Jmm expressions are a small closed set:
//! - Literals (integers, booleans, array literals)
//! - Identifiers, `this`, parenthesized expressions
//! - Binary operators (`+ - * / < && ||`) and negation
//! - Method calls, object and array creation, indexing, `.length`

use super::Span;
use std::fmt;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal: 42
    IntLiteral(IntLiteral),

    /// Boolean literal: true, false
    BooleanLiteral(BooleanLiteral),

    /// Identifier: variable, field, or imported name
    Identifier(Identifier),

    /// `this`
    This(Span),

    /// Parenthesized expression: (a + b)
    Paren(ParenExpression),

    /// Array literal: [1, 2, 3]
    ArrayLiteral(ArrayLiteral),

    /// Negation: !x
    Not(NotExpression),

    /// Index access: arr[0]
    Index(IndexExpression),

    /// Binary expression: x + y, a && b
    Binary(BinaryExpression),

    /// Method call: obj.foo(1, 2)
    Call(CallExpression),

    /// Array creation: new int[n]
    NewArray(NewArrayExpression),

    /// Object creation: new Foo()
    New(NewExpression),

    /// Array length: arr.length
    Length(LengthExpression),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expression::IntLiteral(e) => e.span,
            Expression::BooleanLiteral(e) => e.span,
            Expression::Identifier(e) => e.span,
            Expression::This(span) => *span,
            Expression::Paren(e) => e.span,
            Expression::ArrayLiteral(e) => e.span,
            Expression::Not(e) => e.span,
            Expression::Index(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::NewArray(e) => e.span,
            Expression::New(e) => e.span,
            Expression::Length(e) => e.span,
        }
    }

    /// Check if this expression is a binary operation
    pub fn is_binary(&self) -> bool {
        matches!(self, Expression::Binary(_))
    }

    /// Check if this expression is an integer literal
    pub fn is_int_literal(&self) -> bool {
        matches!(self, Expression::IntLiteral(_))
    }

    /// Name of a plain identifier, `None` for anything else
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expression::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpression {
    pub inner: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpression {
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    LessThan,
    And,
    Or,
}

impl BinaryOperator {
    /// Parse the operator symbol used in the `op` attribute
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            "*" => Some(BinaryOperator::Multiply),
            "/" => Some(BinaryOperator::Divide),
            "<" => Some(BinaryOperator::LessThan),
            "&&" => Some(BinaryOperator::And),
            "||" => Some(BinaryOperator::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::LessThan => "<",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// `+ - * /`
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
        )
    }

    /// `&& ||`
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method call: `receiver.method(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub receiver: Box<Expression>,
    pub method: String,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

/// `new T[size]`
#[derive(Debug, Clone, PartialEq)]
pub struct NewArrayExpression {
    /// Element type name (`int` in Jmm)
    pub element: String,
    pub size: Box<Expression>,
    pub span: Span,
}

/// `new C()`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub class_name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LengthExpression {
    pub array: Box<Expression>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        for op in [
            BinaryOperator::Add,
            BinaryOperator::Subtract,
            BinaryOperator::Multiply,
            BinaryOperator::Divide,
            BinaryOperator::LessThan,
            BinaryOperator::And,
            BinaryOperator::Or,
        ] {
            assert_eq!(BinaryOperator::from_symbol(op.as_str()), Some(op));
        }
        assert_eq!(BinaryOperator::from_symbol("%"), None);
    }

    #[test]
    fn test_operator_classes() {
        assert!(BinaryOperator::Add.is_arithmetic());
        assert!(!BinaryOperator::LessThan.is_arithmetic());
        assert!(BinaryOperator::Or.is_logical());
        assert!(!BinaryOperator::Divide.is_logical());
    }
}
