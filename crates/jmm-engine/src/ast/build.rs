//! Helpers for constructing typed trees directly.
//!
//! Used by library callers that already hold a parsed program and by the
//! test suites. Spans default to `0:0`.

use super::*;

// ============================================================================
// Expressions
// ============================================================================

pub fn int(value: i32) -> Expression {
    Expression::IntLiteral(IntLiteral {
        value,
        span: Span::default(),
    })
}

pub fn boolean(value: bool) -> Expression {
    Expression::BooleanLiteral(BooleanLiteral {
        value,
        span: Span::default(),
    })
}

pub fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier {
        name: name.to_string(),
        span: Span::default(),
    })
}

pub fn this() -> Expression {
    Expression::This(Span::default())
}

pub fn paren(inner: Expression) -> Expression {
    Expression::Paren(ParenExpression {
        inner: Box::new(inner),
        span: Span::default(),
    })
}

pub fn array(elements: Vec<Expression>) -> Expression {
    Expression::ArrayLiteral(ArrayLiteral {
        elements,
        span: Span::default(),
    })
}

pub fn not(operand: Expression) -> Expression {
    Expression::Not(NotExpression {
        operand: Box::new(operand),
        span: Span::default(),
    })
}

pub fn index(array: Expression, index: Expression) -> Expression {
    Expression::Index(IndexExpression {
        array: Box::new(array),
        index: Box::new(index),
        span: Span::default(),
    })
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span: Span::default(),
    })
}

pub fn add(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Add, left, right)
}

pub fn sub(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Subtract, left, right)
}

pub fn mul(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Multiply, left, right)
}

pub fn less(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::LessThan, left, right)
}

pub fn and(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::And, left, right)
}

pub fn or(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Or, left, right)
}

pub fn call(receiver: Expression, method: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Call(CallExpression {
        receiver: Box::new(receiver),
        method: method.to_string(),
        arguments,
        span: Span::default(),
    })
}

pub fn new_int_array(size: Expression) -> Expression {
    Expression::NewArray(NewArrayExpression {
        element: "int".to_string(),
        size: Box::new(size),
        span: Span::default(),
    })
}

pub fn new_object(class_name: &str) -> Expression {
    Expression::New(NewExpression {
        class_name: class_name.to_string(),
        span: Span::default(),
    })
}

pub fn length(array: Expression) -> Expression {
    Expression::Length(LengthExpression {
        array: Box::new(array),
        span: Span::default(),
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn assign(target: Expression, value: Expression) -> Statement {
    Statement::Assign(AssignStmt {
        target,
        value,
        span: Span::default(),
    })
}

/// `name = value;`
pub fn assign_var(name: &str, value: Expression) -> Statement {
    assign(ident(name), value)
}

pub fn expr_stmt(expr: Expression) -> Statement {
    Statement::Expr(ExprStmt {
        expr,
        span: Span::default(),
    })
}

pub fn ret(value: Expression) -> Statement {
    Statement::Return(ReturnStmt {
        value: Some(value),
        span: Span::default(),
    })
}

pub fn if_else(
    condition: Expression,
    then_branch: Vec<Statement>,
    else_branch: Vec<Statement>,
) -> Statement {
    Statement::If(IfStmt {
        condition,
        then_branch,
        else_branch,
        span: Span::default(),
    })
}

pub fn while_loop(condition: Expression, body: Vec<Statement>) -> Statement {
    Statement::While(WhileStmt {
        condition,
        body,
        span: Span::default(),
    })
}

// ============================================================================
// Declarations
// ============================================================================

pub fn int_ty() -> TypeAnnotation {
    TypeAnnotation::named("int")
}

pub fn bool_ty() -> TypeAnnotation {
    TypeAnnotation::named("boolean")
}

pub fn void_ty() -> TypeAnnotation {
    TypeAnnotation::named("void")
}

/// Builder for [`MethodDecl`]
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    decl: MethodDecl,
}

impl MethodBuilder {
    /// Public instance method returning `void`
    pub fn new(name: &str) -> Self {
        Self {
            decl: MethodDecl {
                name: name.to_string(),
                is_public: true,
                is_static: false,
                return_type: void_ty(),
                params: Vec::new(),
                locals: Vec::new(),
                body: Vec::new(),
                span: Span::default(),
            },
        }
    }

    pub fn make_static(mut self) -> Self {
        self.decl.is_static = true;
        self
    }

    pub fn returns(mut self, ty: TypeAnnotation) -> Self {
        self.decl.return_type = ty;
        self
    }

    pub fn param(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.params.push(Param {
            name: name.to_string(),
            ty,
            span: Span::default(),
        });
        self
    }

    pub fn local(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.locals.push(VarDecl {
            name: name.to_string(),
            ty,
            is_private: false,
            span: Span::default(),
        });
        self
    }

    pub fn stmt(mut self, stmt: Statement) -> Self {
        self.decl.body.push(stmt);
        self
    }

    pub fn build(self) -> MethodDecl {
        self.decl
    }
}

/// Builder for [`ClassDecl`]
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    decl: ClassDecl,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            decl: ClassDecl {
                name: name.to_string(),
                extends: None,
                fields: Vec::new(),
                methods: Vec::new(),
                span: Span::default(),
            },
        }
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.decl.extends = Some(superclass.to_string());
        self
    }

    pub fn field(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.fields.push(VarDecl {
            name: name.to_string(),
            ty,
            is_private: false,
            span: Span::default(),
        });
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.decl.methods.push(method);
        self
    }

    pub fn build(self) -> ClassDecl {
        self.decl
    }
}

/// Program with the given dotted imports and a single class
pub fn program(imports: &[&str], class: ClassDecl) -> Program {
    let imports = imports
        .iter()
        .map(|path| ImportDecl {
            path: path.split('.').map(str::to_string).collect(),
            span: Span::default(),
        })
        .collect();
    Program::new(imports, vec![class])
}
