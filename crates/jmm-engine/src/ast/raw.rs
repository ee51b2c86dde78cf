//! Kind-tagged input tree and its conversion into the typed AST.
//!
//! The parser front end serializes every node as
//! `{"kind": .., "attributes": {..}, "children": [..], "line": .., "column": ..}`.
//! Attribute values are strings, booleans, numbers, or string lists.

use super::*;
use crate::error::{CompileError, CompileResult};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic node as produced by the external parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub kind: String,

    #[serde(default)]
    pub attributes: FxHashMap<String, Value>,

    #[serde(default)]
    pub children: Vec<RawNode>,

    #[serde(default)]
    pub line: u32,

    #[serde(default, alias = "col")]
    pub column: u32,
}

const BLOCK_KINDS: &[&str] = &["BlockStmt", "Block", "Stmt", "ScopeStmt"];
const PARAM_LIST_KINDS: &[&str] = &["Params", "ParamList", "Parameters", "MethodParams"];
const TYPE_KINDS: &[&str] = &["Type", "ArrayType"];

impl RawNode {
    /// Create a node with no attributes or children
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: FxHashMap::default(),
            children: Vec::new(),
            line: 0,
            column: 0,
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Add a child
    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    /// Read a tree from JSON text
    pub fn from_json(text: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn is(&self, kinds: &[&str]) -> bool {
        kinds.contains(&self.kind.as_str())
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::malformed(&self.kind, self.span(), message)
    }

    /// String attribute; numbers and booleans are rendered as text
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.attributes.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn required_attr(&self, name: &str) -> CompileResult<String> {
        self.attr(name)
            .ok_or_else(|| self.error(format!("missing attribute '{name}'")))
    }

    /// Boolean attribute, `false` when absent
    pub fn flag(&self, name: &str) -> bool {
        match self.attributes.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// String-list attribute; accepts a JSON array or a `"[a, b]"` string
    pub fn attr_list(&self, name: &str) -> Option<Vec<String>> {
        match self.attributes.get(name)? {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            Value::String(s) => {
                let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
                Some(
                    trimmed
                        .split([',', '.'])
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect(),
                )
            }
            _ => None,
        }
    }

    fn child(&self, index: usize) -> CompileResult<&RawNode> {
        self.children
            .get(index)
            .ok_or_else(|| self.error(format!("expected a child at position {index}")))
    }

    /// Convert this node (a `Program`) into the typed AST
    pub fn to_program(&self) -> CompileResult<Program> {
        if self.kind != "Program" {
            return Err(self.error("expected a Program root"));
        }
        let mut imports = Vec::new();
        let mut classes = Vec::new();
        for child in &self.children {
            match child.kind.as_str() {
                "ImportStmt" | "ImportDecl" => imports.push(child.to_import()?),
                "ClassDecl" => classes.push(child.to_class()?),
                _ => return Err(child.error("unexpected top-level node")),
            }
        }
        Ok(Program {
            imports,
            classes,
            span: self.span(),
        })
    }

    fn to_import(&self) -> CompileResult<ImportDecl> {
        let path = match self.attr_list("value") {
            Some(path) => path,
            None => self
                .required_attr("name")?
                .split('.')
                .map(str::to_string)
                .collect(),
        };
        if path.is_empty() {
            return Err(self.error("empty import path"));
        }
        Ok(ImportDecl {
            path,
            span: self.span(),
        })
    }

    fn to_class(&self) -> CompileResult<ClassDecl> {
        let extends = self
            .attr("extendedClass")
            .or_else(|| self.attr("extends"))
            .filter(|name| !name.is_empty());
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        for child in &self.children {
            match child.kind.as_str() {
                "VarDecl" | "VarDeclaration" => fields.push(child.to_var_decl()?),
                "MethodDecl" => methods.push(child.to_method()?),
                _ => return Err(child.error("unexpected class member")),
            }
        }
        Ok(ClassDecl {
            name: self.required_attr("name")?,
            extends,
            fields,
            methods,
            span: self.span(),
        })
    }

    fn to_type(&self) -> CompileResult<TypeAnnotation> {
        match self.kind.as_str() {
            "ArrayType" => {
                let element = self.child(0)?;
                Ok(TypeAnnotation {
                    name: element.required_attr("name")?,
                    is_array: true,
                    is_vararg: false,
                    span: self.span(),
                })
            }
            "Type" => Ok(TypeAnnotation {
                name: self.required_attr("name")?,
                is_array: self.flag("isArray"),
                is_vararg: self.flag("isVarArg"),
                span: self.span(),
            }),
            _ => Err(self.error("expected a type node")),
        }
    }

    fn to_var_decl(&self) -> CompileResult<VarDecl> {
        Ok(VarDecl {
            name: self.required_attr("name")?,
            ty: self.child(0)?.to_type()?,
            is_private: self.flag("isPrivate"),
            span: self.span(),
        })
    }

    fn to_param(&self) -> CompileResult<Param> {
        Ok(Param {
            name: self.required_attr("name")?,
            ty: self.child(0)?.to_type()?,
            span: self.span(),
        })
    }

    fn to_method(&self) -> CompileResult<MethodDecl> {
        let (return_type, rest) = match self.children.split_first() {
            Some((first, rest)) if first.is(TYPE_KINDS) => (first.to_type()?, rest),
            _ => (TypeAnnotation::named("void"), self.children.as_slice()),
        };

        let mut params = Vec::new();
        let mut locals = Vec::new();
        let mut body = Vec::new();
        for child in rest {
            match child.kind.as_str() {
                "Parameter" | "Param" => params.push(child.to_param()?),
                "VarDecl" | "VarDeclaration" => locals.push(child.to_var_decl()?),
                _ if child.is(PARAM_LIST_KINDS) => {
                    for param in &child.children {
                        params.push(param.to_param()?);
                    }
                }
                _ => child.push_statements(&mut body)?,
            }
        }

        Ok(MethodDecl {
            name: self.required_attr("name")?,
            is_public: self.flag("isPublic"),
            is_static: self.flag("isStatic"),
            return_type,
            params,
            locals,
            body,
            span: self.span(),
        })
    }

    /// Append this statement to `out`, flattening nested blocks
    fn push_statements(&self, out: &mut Vec<Statement>) -> CompileResult<()> {
        if self.is(BLOCK_KINDS) {
            for child in &self.children {
                child.push_statements(out)?;
            }
        } else {
            out.push(self.to_statement()?);
        }
        Ok(())
    }

    fn to_block(&self) -> CompileResult<Vec<Statement>> {
        let mut out = Vec::new();
        self.push_statements(&mut out)?;
        Ok(out)
    }

    fn to_statement(&self) -> CompileResult<Statement> {
        let span = self.span();
        let stmt = match self.kind.as_str() {
            "AssignStmt" => {
                let (target, value) = match (self.children.len(), self.attr("name")) {
                    (1, Some(name)) => (
                        Expression::Identifier(Identifier { name, span }),
                        self.child(0)?.to_expression()?,
                    ),
                    _ => (
                        self.child(0)?.to_expression()?,
                        self.child(1)?.to_expression()?,
                    ),
                };
                Statement::Assign(AssignStmt {
                    target,
                    value,
                    span,
                })
            }
            "ExprStmt" => Statement::Expr(ExprStmt {
                expr: self.child(0)?.to_expression()?,
                span,
            }),
            "ReturnStmt" => Statement::Return(ReturnStmt {
                value: self
                    .children
                    .first()
                    .map(RawNode::to_expression)
                    .transpose()?,
                span,
            }),
            "IfElseStmt" | "IfStmt" => Statement::If(IfStmt {
                condition: self.child(0)?.to_expression()?,
                then_branch: self.child(1)?.to_block()?,
                else_branch: match self.children.get(2) {
                    Some(node) => node.to_block()?,
                    None => Vec::new(),
                },
                span,
            }),
            "WhileStmt" => Statement::While(WhileStmt {
                condition: self.child(0)?.to_expression()?,
                body: self.child(1)?.to_block()?,
                span,
            }),
            _ => return Err(self.error("unknown statement kind")),
        };
        Ok(stmt)
    }

    fn boxed(&self, index: usize) -> CompileResult<Box<Expression>> {
        Ok(Box::new(self.child(index)?.to_expression()?))
    }

    /// Convert an expression node
    pub fn to_expression(&self) -> CompileResult<Expression> {
        let span = self.span();
        let expr = match self.kind.as_str() {
            "IntegerLiteral" => {
                let text = self.required_attr("value")?;
                let value = text
                    .parse::<i32>()
                    .map_err(|_| self.error(format!("'{text}' is not a 32-bit integer")))?;
                Expression::IntLiteral(IntLiteral { value, span })
            }
            "BoolValue" | "BooleanLiteral" => {
                let text = self
                    .attr("name")
                    .or_else(|| self.attr("value"))
                    .ok_or_else(|| self.error("missing boolean value"))?;
                let value = match text.as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(self.error(format!("'{text}' is not a boolean"))),
                };
                Expression::BooleanLiteral(BooleanLiteral { value, span })
            }
            "Identifier" | "VarRefExpr" => Expression::Identifier(Identifier {
                name: self.required_attr("name")?,
                span,
            }),
            "This" => Expression::This(span),
            "Parentesis" | "ParenExpr" => Expression::Paren(ParenExpression {
                inner: self.boxed(0)?,
                span,
            }),
            "SimpleArray" | "ArrayLiteral" => Expression::ArrayLiteral(ArrayLiteral {
                elements: self
                    .children
                    .iter()
                    .map(RawNode::to_expression)
                    .collect::<CompileResult<_>>()?,
                span,
            }),
            "NegOperator" | "Not" => Expression::Not(NotExpression {
                operand: self.boxed(0)?,
                span,
            }),
            "ArrayAccess" => Expression::Index(IndexExpression {
                array: self.boxed(0)?,
                index: self.boxed(1)?,
                span,
            }),
            "BinaryExpr" => {
                let symbol = self.required_attr("op")?;
                let operator = BinaryOperator::from_symbol(&symbol)
                    .ok_or_else(|| self.error(format!("unknown operator '{symbol}'")))?;
                Expression::Binary(BinaryExpression {
                    operator,
                    left: self.boxed(0)?,
                    right: self.boxed(1)?,
                    span,
                })
            }
            "ObjectFunctionCall" | "MethodCall" => {
                let mut arguments = Vec::new();
                for child in self.children.iter().skip(1) {
                    if child.kind == "FuncParameter" {
                        for arg in &child.children {
                            arguments.push(arg.to_expression()?);
                        }
                    } else {
                        arguments.push(child.to_expression()?);
                    }
                }
                Expression::Call(CallExpression {
                    receiver: self.boxed(0)?,
                    method: self.required_attr("name")?,
                    arguments,
                    span,
                })
            }
            "NewArray" => {
                // The size expression is the last child; a leading type node is optional.
                let size = self
                    .children
                    .last()
                    .ok_or_else(|| self.error("missing array size"))?;
                let element = match self.children.first() {
                    Some(first) if first.is(TYPE_KINDS) => first.to_type()?.name,
                    _ => self.attr("name").unwrap_or_else(|| "int".to_string()),
                };
                Expression::NewArray(NewArrayExpression {
                    element,
                    size: Box::new(size.to_expression()?),
                    span,
                })
            }
            "NewClass" | "NewObject" => Expression::New(NewExpression {
                class_name: self.required_attr("name")?,
                span,
            }),
            "Length" => Expression::Length(LengthExpression {
                array: self.boxed(0)?,
                span,
            }),
            _ => return Err(self.error("unknown expression kind")),
        };
        Ok(expr)
    }
}
