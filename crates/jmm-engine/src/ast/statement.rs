//! Statement AST nodes

use super::{Expression, Span};

/// Statement inside a method body
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `target = value;` where target is an identifier or array access
    Assign(AssignStmt),

    /// Expression evaluated for its side effects: `io.println(x);`
    Expr(ExprStmt),

    /// `return value;`
    Return(ReturnStmt),

    /// `if (cond) { .. } else { .. }`
    If(IfStmt),

    /// `while (cond) { .. }`
    While(WhileStmt),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> Span {
        match self {
            Statement::Assign(s) => s.span,
            Statement::Expr(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::If(s) => s.span,
            Statement::While(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Expression,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expression>,
    pub span: Span,
}

/// Two-armed conditional; an absent `else` is an empty list
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub else_branch: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub span: Span,
}
