//! Statement-level type checking
//!
//! Walks every method body and reports violations as [`CheckError`]s.
//! A failing check only skips the remaining checks of the same node;
//! sibling and nested nodes are still visited.

use super::assignability::{can_assign, reconcile_arguments};
use super::error::CheckError;
use super::resolve::TypeResolver;
use super::scope::ScopeRegistry;
use super::symbols::SymbolTable;
use super::types::Type;
use crate::ast::*;

/// Type checker over a whole program
pub struct TypeChecker<'a> {
    table: &'a SymbolTable,
    scopes: &'a ScopeRegistry,
    errors: Vec<CheckError>,
}

/// Cursor for the method being checked
struct MethodCursor<'a> {
    resolver: TypeResolver<'a>,
    decl: &'a MethodDecl,
}

impl<'a> TypeChecker<'a> {
    pub fn new(table: &'a SymbolTable, scopes: &'a ScopeRegistry) -> Self {
        Self {
            table,
            scopes,
            errors: Vec::new(),
        }
    }

    /// Check every method of every class; returns the collected errors
    pub fn check_program(mut self, program: &'a Program) -> Vec<CheckError> {
        for class in &program.classes {
            for method in &class.methods {
                self.check_method(method);
            }
        }
        tracing::debug!(errors = self.errors.len(), "type checking finished");
        self.errors
    }

    fn check_method(&mut self, decl: &'a MethodDecl) {
        tracing::trace!(method = %decl.name, "checking method");
        let cursor = MethodCursor {
            resolver: TypeResolver::new(self.table, self.scopes, &decl.name),
            decl,
        };
        for stmt in &decl.body {
            self.check_statement(&cursor, stmt);
        }
    }

    fn check_statement(&mut self, cursor: &MethodCursor<'a>, stmt: &Statement) {
        match stmt {
            Statement::Assign(assign) => {
                self.check_assignment(cursor, assign);
                self.visit_expression(cursor, &assign.target);
                self.visit_expression(cursor, &assign.value);
            }
            Statement::Expr(expr) => self.visit_expression(cursor, &expr.expr),
            Statement::Return(ret) => {
                self.check_return(cursor, ret);
                if let Some(value) = &ret.value {
                    self.visit_expression(cursor, value);
                }
            }
            Statement::If(if_stmt) => {
                self.check_condition(cursor, "If", &if_stmt.condition, if_stmt.span);
                self.visit_expression(cursor, &if_stmt.condition);
                for stmt in if_stmt.then_branch.iter().chain(&if_stmt.else_branch) {
                    self.check_statement(cursor, stmt);
                }
            }
            Statement::While(while_stmt) => {
                self.check_condition(cursor, "While", &while_stmt.condition, while_stmt.span);
                self.visit_expression(cursor, &while_stmt.condition);
                for stmt in &while_stmt.body {
                    self.check_statement(cursor, stmt);
                }
            }
        }
    }

    fn check_condition(
        &mut self,
        cursor: &MethodCursor<'a>,
        construct: &'static str,
        condition: &Expression,
        span: Span,
    ) {
        let ty = cursor.resolver.expr_type(condition);
        if !ty.is_boolean() {
            self.errors.push(CheckError::NonBooleanCondition {
                construct,
                method: cursor.decl.name.clone(),
                found: ty.to_string(),
                span,
            });
        }
    }

    fn check_assignment(&mut self, cursor: &MethodCursor<'a>, assign: &AssignStmt) {
        let target_ty = cursor.resolver.expr_type(&assign.target);
        let value_ty = cursor.resolver.expr_type(&assign.value);

        let target_name = match &assign.target {
            Expression::Index(index) => index.array.as_identifier(),
            other => other.as_identifier(),
        }
        .unwrap_or_default()
        .to_string();

        if cursor.decl.is_static && self.scopes.resolves_to_field(&target_name, &cursor.decl.name) {
            self.errors.push(CheckError::StaticFieldAssignment {
                method: cursor.decl.name.clone(),
                field: target_name.clone(),
                span: assign.span,
            });
        }

        if !can_assign(self.table, &value_ty, &target_ty) {
            self.errors.push(CheckError::IncompatibleAssignment {
                method: cursor.decl.name.clone(),
                target: target_name,
                target_ty: target_ty.to_string(),
                value_ty: value_ty.to_string(),
                span: assign.span,
            });
        }
    }

    fn check_return(&mut self, cursor: &MethodCursor<'a>, ret: &ReturnStmt) {
        let expected = Type::from_annotation(&cursor.decl.return_type);
        let found = match &ret.value {
            Some(value) => cursor.resolver.expr_type(value),
            None => Type::void(),
        };

        if found.is_error() {
            self.errors.push(CheckError::InvalidReturnOperation {
                method: cursor.decl.name.clone(),
                span: ret.span,
            });
        } else if found != expected {
            self.errors.push(CheckError::ReturnTypeMismatch {
                method: cursor.decl.name.clone(),
                expected: expected.to_string(),
                found: found.to_string(),
                span: ret.span,
            });
        }
    }

    /// Visit an expression tree for `this` usage and calls on this class
    fn visit_expression(&mut self, cursor: &MethodCursor<'a>, expr: &Expression) {
        match expr {
            Expression::This(span) => {
                if cursor.decl.is_static {
                    self.errors.push(CheckError::ThisInStatic {
                        method: cursor.decl.name.clone(),
                        span: *span,
                    });
                }
            }
            Expression::Call(call) => {
                self.check_call(cursor, call);
                self.visit_expression(cursor, &call.receiver);
                for arg in &call.arguments {
                    self.visit_expression(cursor, arg);
                }
            }
            Expression::Paren(paren) => self.visit_expression(cursor, &paren.inner),
            Expression::ArrayLiteral(array) => {
                for element in &array.elements {
                    self.visit_expression(cursor, element);
                }
            }
            Expression::Not(not) => self.visit_expression(cursor, &not.operand),
            Expression::Index(index) => {
                self.visit_expression(cursor, &index.array);
                self.visit_expression(cursor, &index.index);
            }
            Expression::Binary(binary) => {
                self.visit_expression(cursor, &binary.left);
                self.visit_expression(cursor, &binary.right);
            }
            Expression::NewArray(new_array) => self.visit_expression(cursor, &new_array.size),
            Expression::Length(length) => self.visit_expression(cursor, &length.array),
            Expression::IntLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::Identifier(_)
            | Expression::New(_) => {}
        }
    }

    fn check_call(&mut self, cursor: &MethodCursor<'a>, call: &CallExpression) {
        let receiver = cursor.resolver.expr_type(&call.receiver);
        if !matches!(&receiver, Type::Named(name) if name == self.table.class_name()) {
            return;
        }
        // Inherited methods cannot be verified locally
        if self.table.superclass().is_some() {
            return;
        }

        let Some(signature) = self.table.method(&call.method) else {
            self.errors.push(CheckError::MethodNotFound {
                caller: cursor.decl.name.clone(),
                callee: call.method.clone(),
                span: call.span,
            });
            return;
        };

        let actuals: Vec<Type> = call
            .arguments
            .iter()
            .map(|arg| cursor.resolver.expr_type(arg))
            .collect();
        if !reconcile_arguments(self.table, &signature.params, &actuals) {
            self.errors.push(CheckError::ArgumentMismatch {
                caller: cursor.decl.name.clone(),
                callee: call.method.clone(),
                span: call.span,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;

    fn check(program: &Program) -> Vec<CheckError> {
        let table = SymbolTable::build(program).unwrap();
        let (scopes, _) = ScopeRegistry::build(&table, program);
        TypeChecker::new(&table, &scopes).check_program(program)
    }

    fn class_with(method: MethodDecl) -> Program {
        program(
            &["io"],
            ClassBuilder::new("Main")
                .field("count", int_ty())
                .method(method)
                .method(
                    MethodBuilder::new("sum")
                        .returns(int_ty())
                        .param("v", TypeAnnotation::vararg("int"))
                        .stmt(ret(int(0)))
                        .build(),
                )
                .build(),
        )
    }

    #[test]
    fn test_well_typed_method_has_no_errors() {
        let method = MethodBuilder::new("run")
            .returns(int_ty())
            .local("a", int_ty())
            .local("ok", bool_ty())
            .stmt(assign_var("a", add(int(1), int(2))))
            .stmt(assign_var("ok", less(ident("a"), int(10))))
            .stmt(if_else(ident("ok"), vec![assign_var("a", int(0))], vec![]))
            .stmt(while_loop(less(ident("a"), int(3)), vec![assign_var("a", add(ident("a"), int(1)))]))
            .stmt(expr_stmt(call(ident("io"), "println", vec![ident("a")])))
            .stmt(ret(call(this(), "sum", vec![int(1), int(2)])))
            .build();
        assert_eq!(check(&class_with(method)), vec![]);
    }

    #[test]
    fn test_non_boolean_conditions() {
        let method = MethodBuilder::new("run")
            .stmt(if_else(int(1), vec![], vec![]))
            .stmt(while_loop(add(int(1), int(2)), vec![]))
            .build();
        let errors = check(&class_with(method));
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], CheckError::NonBooleanCondition { construct: "If", found, .. } if found == "int"));
        assert!(matches!(&errors[1], CheckError::NonBooleanCondition { construct: "While", .. }));
    }

    #[test]
    fn test_incompatible_assignment() {
        let method = MethodBuilder::new("run")
            .local("a", int_ty())
            .stmt(assign_var("a", boolean(true)))
            .build();
        let errors = check(&class_with(method));
        assert!(matches!(&errors[..], [CheckError::IncompatibleAssignment { target, .. }] if target == "a"));
    }

    #[test]
    fn test_field_assignment_from_static() {
        let method = MethodBuilder::new("main")
            .make_static()
            .stmt(assign_var("count", int(1)))
            .build();
        let errors = check(&class_with(method));
        assert!(matches!(&errors[..], [CheckError::StaticFieldAssignment { field, .. }] if field == "count"));
    }

    #[test]
    fn test_local_shadowing_field_in_static_is_fine() {
        let method = MethodBuilder::new("main")
            .make_static()
            .local("count", int_ty())
            .stmt(assign_var("count", int(1)))
            .build();
        assert!(check(&class_with(method)).is_empty());
    }

    #[test]
    fn test_return_errors_are_distinct() {
        let invalid = MethodBuilder::new("run")
            .returns(int_ty())
            .stmt(ret(add(int(1), boolean(true))))
            .build();
        assert!(matches!(
            &check(&class_with(invalid))[..],
            [CheckError::InvalidReturnOperation { .. }]
        ));

        let mismatch = MethodBuilder::new("run")
            .returns(int_ty())
            .stmt(ret(boolean(true)))
            .build();
        assert!(matches!(
            &check(&class_with(mismatch))[..],
            [CheckError::ReturnTypeMismatch { expected, found, .. }] if expected == "int" && found == "boolean"
        ));
    }

    #[test]
    fn test_this_in_static() {
        let method = MethodBuilder::new("main")
            .make_static()
            .stmt(expr_stmt(call(this(), "sum", vec![])))
            .build();
        let errors = check(&class_with(method));
        assert!(matches!(&errors[..], [CheckError::ThisInStatic { .. }]));
    }

    #[test]
    fn test_unknown_method_skips_argument_check() {
        let method = MethodBuilder::new("run")
            .stmt(expr_stmt(call(this(), "missing", vec![boolean(true)])))
            .build();
        let errors = check(&class_with(method));
        assert!(matches!(&errors[..], [CheckError::MethodNotFound { callee, .. }] if callee == "missing"));
    }

    #[test]
    fn test_argument_mismatch() {
        let method = MethodBuilder::new("run")
            .stmt(expr_stmt(call(this(), "sum", vec![int(1), boolean(true)])))
            .build();
        let errors = check(&class_with(method));
        assert!(matches!(&errors[..], [CheckError::ArgumentMismatch { .. }]));
    }

    #[test]
    fn test_extra_arguments_are_not_checked() {
        let program = program(
            &[],
            ClassBuilder::new("Main")
                .method(
                    MethodBuilder::new("f")
                        .returns(int_ty())
                        .param("a", int_ty())
                        .stmt(ret(ident("a")))
                        .build(),
                )
                .method(
                    MethodBuilder::new("g")
                        .stmt(expr_stmt(call(this(), "f", vec![int(1), int(2)])))
                        .stmt(expr_stmt(call(this(), "f", vec![int(1), boolean(true)])))
                        .build(),
                )
                .build(),
        );
        assert_eq!(check(&program), vec![]);
    }

    #[test]
    fn test_superclass_call_is_accepted() {
        let program = program(
            &[],
            ClassBuilder::new("Main")
                .extends("Base")
                .method(
                    MethodBuilder::new("run")
                        .stmt(expr_stmt(call(this(), "inherited", vec![int(1)])))
                        .build(),
                )
                .build(),
        );
        assert!(check(&program).is_empty());
    }

    #[test]
    fn test_nested_calls_are_checked() {
        let method = MethodBuilder::new("run")
            .local("a", int_ty())
            .stmt(assign_var("a", call(this(), "sum", vec![call(this(), "nope", vec![])])))
            .build();
        let errors = check(&class_with(method));
        // `nope` infers to error, so the outer call's arguments fail too
        assert!(errors.iter().any(|e| matches!(e, CheckError::MethodNotFound { callee, .. } if callee == "nope")));
        assert!(errors.iter().any(|e| matches!(e, CheckError::ArgumentMismatch { callee, .. } if callee == "sum")));
    }
}
