//! Expression type inference
//!
//! [`TypeResolver::expr_type`] is a total, side-effect-free function over
//! expressions, bound to the method whose body is being analyzed. Failed
//! inference yields [`Type::Error`] rather than an error value.

use super::scope::ScopeRegistry;
use super::symbols::SymbolTable;
use super::types::Type;
use crate::ast::{BinaryOperator, Expression};

/// Type inference for expressions inside one method
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    table: &'a SymbolTable,
    scopes: &'a ScopeRegistry,
    method: &'a str,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SymbolTable, scopes: &'a ScopeRegistry, method: &'a str) -> Self {
        Self {
            table,
            scopes,
            method,
        }
    }

    pub fn table(&self) -> &'a SymbolTable {
        self.table
    }

    pub fn scopes(&self) -> &'a ScopeRegistry {
        self.scopes
    }

    /// Name of the method this resolver is bound to
    pub fn method(&self) -> &'a str {
        self.method
    }

    /// Infer the type of an expression
    pub fn expr_type(&self, expr: &Expression) -> Type {
        match expr {
            Expression::IntLiteral(_) | Expression::Length(_) => Type::int(),
            Expression::BooleanLiteral(_) => Type::boolean(),
            Expression::Identifier(id) => self.identifier_type(&id.name),
            Expression::This(_) => Type::named(self.table.class_name()),
            Expression::Paren(paren) => self.expr_type(&paren.inner),
            Expression::ArrayLiteral(array) => {
                if array.elements.iter().all(Expression::is_int_literal) {
                    Type::ArrayInit
                } else {
                    Type::Error
                }
            }
            Expression::Not(not) => match self.expr_type(&not.operand) {
                ty if ty.is_boolean() => ty,
                _ => Type::Error,
            },
            Expression::Index(index) => {
                let base = self.expr_type(&index.array);
                let vararg = self.is_vararg_identifier(&index.array);
                if !self.expr_type(&index.index).is_int() {
                    return Type::Error;
                }
                match base.element_type() {
                    Some(element) => element,
                    None if vararg => base,
                    None => Type::Error,
                }
            }
            Expression::Binary(binary) => {
                let left = self.expr_type(&binary.left);
                let right = self.expr_type(&binary.right);
                binary_type(binary.operator, left, right)
            }
            Expression::Call(call) => {
                let receiver = self.expr_type(&call.receiver);
                if let Type::Named(name) = &receiver {
                    if self.table.is_import(name) {
                        return self.current_return_type();
                    }
                }
                if self.names_import(&call.receiver) {
                    return Type::void();
                }
                match &receiver {
                    Type::Named(name) if name == self.table.class_name() => self
                        .table
                        .return_type(&call.method)
                        .cloned()
                        .unwrap_or(Type::Error),
                    _ => Type::Error,
                }
            }
            Expression::NewArray(_) => Type::NewArray,
            Expression::New(new) => Type::named(&new.class_name),
        }
    }

    /// Resolve an identifier through the scope registry; import names win
    pub fn identifier_type(&self, name: &str) -> Type {
        if self.table.is_import(name) {
            return Type::Imported;
        }
        self.scopes
            .lookup(name, self.method)
            .map(|entry| entry.ty.clone())
            .unwrap_or(Type::Error)
    }

    /// True if the expression is an identifier bound to a vararg parameter
    pub fn is_vararg_identifier(&self, expr: &Expression) -> bool {
        expr.as_identifier()
            .is_some_and(|name| self.scopes.is_vararg(name, self.method))
    }

    /// True if the expression is an identifier naming an import
    pub fn names_import(&self, expr: &Expression) -> bool {
        expr.as_identifier()
            .is_some_and(|name| self.table.is_import(name))
    }

    fn current_return_type(&self) -> Type {
        self.table
            .return_type(self.method)
            .cloned()
            .unwrap_or(Type::Error)
    }
}

fn binary_type(operator: BinaryOperator, left: Type, right: Type) -> Type {
    let same = left == right && !left.is_array() && !right.is_array();
    match operator {
        BinaryOperator::And | BinaryOperator::Or => {
            if same && left.is_boolean() {
                left
            } else {
                Type::Error
            }
        }
        BinaryOperator::LessThan => {
            if same && !left.is_boolean() {
                Type::boolean()
            } else {
                Type::Error
            }
        }
        _ => {
            if same && !left.is_boolean() {
                left
            } else {
                Type::Error
            }
        }
    }
}
