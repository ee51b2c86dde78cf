//! AST to IR Lowering
//!
//! Converts the analyzed AST into the IR representation. Every expression
//! lowers to an [`ExprResult`]: the instructions that must run first
//! (`computation`) and the value to use at the use site.

mod expr;
mod stmt;

use crate::ast::{Expression, MethodDecl, Program};
use crate::compiler::context::CompilationContext;
use crate::compiler::ir::{Element, Instruction, IrClass, IrField, IrItem, IrMethod, IrType};
use crate::error::{CompileError, CompileResult};
use crate::semantic::{Analysis, ScopeRegistry, SymbolTable, Type, TypeResolver};

/// Where a lowered expression is used
///
/// Binary operations and array reads stay inline only at `Condition` and
/// `Assign` sites; everywhere else they are materialized into temporaries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Usage {
    /// Operand of another expression, argument, or return value
    Operand,
    /// Operand whose type is fixed by where it goes (a declared formal or a
    /// field being written)
    Expected(IrType),
    /// `if`/`while` condition
    Condition,
    /// Expression statement
    Statement,
    /// Right-hand side of an assignment with the given target type
    Assign(IrType),
}

impl Usage {
    fn is_inline_site(&self) -> bool {
        matches!(self, Usage::Condition | Usage::Assign(_))
    }

    /// Use site of a parenthesised expression's inner expression
    ///
    /// The parenthesis is the parent, so the inner expression is never
    /// inline; its expected type is kept.
    fn through_paren(&self) -> Usage {
        match self {
            Usage::Assign(ty) | Usage::Expected(ty) => Usage::Expected(ty.clone()),
            Usage::Condition => Usage::Expected(IrType::Boolean),
            Usage::Operand => Usage::Operand,
            Usage::Statement => Usage::Statement,
        }
    }
}

/// Lowered expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExprResult {
    pub value: Instruction,
    pub computation: Vec<IrItem>,
}

impl ExprResult {
    fn new(value: Instruction, computation: Vec<IrItem>) -> Self {
        Self { value, computation }
    }

    fn element(element: Element) -> Self {
        Self::new(Instruction::Single(element), Vec::new())
    }
}

/// Lower a whole program into its IR class
pub fn lower_program(
    analysis: &Analysis,
    program: &Program,
    ctx: &mut CompilationContext,
) -> CompileResult<IrClass> {
    let class = program
        .classes
        .first()
        .ok_or_else(|| CompileError::internal("no class to lower"))?;
    let table = &analysis.table;

    let mut ir = IrClass::new(table.class_name());
    ir.imports = table.imports().to_vec();
    ir.superclass = table.superclass().map(str::to_string);
    ir.fields = class
        .fields
        .iter()
        .filter_map(|decl| table.field(&decl.name))
        .map(|symbol| IrField {
            name: symbol.name.clone(),
            ty: IrType::from_type(&symbol.ty, false),
            is_private: table.is_private_field(&symbol.name),
        })
        .collect();

    for decl in &class.methods {
        let method = Lowerer::new(table, &analysis.scopes, ctx, decl).lower_method();
        ir.methods.push(method);
    }

    tracing::debug!(class = %ir.name, methods = ir.methods.len(), "lowered to IR");
    Ok(ir)
}

/// Lowering state for one method body
pub struct Lowerer<'a, 'c> {
    table: &'a SymbolTable,
    scopes: &'a ScopeRegistry,
    resolver: TypeResolver<'a>,
    ctx: &'c mut CompilationContext,
    decl: &'a MethodDecl,
}

impl<'a, 'c> Lowerer<'a, 'c> {
    pub fn new(
        table: &'a SymbolTable,
        scopes: &'a ScopeRegistry,
        ctx: &'c mut CompilationContext,
        decl: &'a MethodDecl,
    ) -> Self {
        Self {
            table,
            scopes,
            resolver: TypeResolver::new(table, scopes, &decl.name),
            ctx,
            decl,
        }
    }

    /// Lower the method, appending an implicit `ret.V` when the body has no
    /// top-level return
    pub fn lower_method(mut self) -> IrMethod {
        let decl = self.decl;
        tracing::trace!(method = %decl.name, "lowering method");
        let return_type = IrType::from_type(&Type::from_annotation(&decl.return_type), false);
        let mut method = IrMethod::new(&decl.name, return_type);
        method.is_public = decl.is_public;
        method.is_static = decl.is_static;

        if let Some(signature) = self.table.method(&decl.name) {
            method.params = signature
                .params
                .iter()
                .map(|param| {
                    Element::operand(&param.name, IrType::from_type(&param.ty, param.is_vararg))
                })
                .collect();
        }

        for stmt in &decl.body {
            let items = self.lower_stmt(stmt);
            method.extend(items);
        }

        if !decl.has_return() {
            method.push(Instruction::Return {
                ty: IrType::Void,
                value: None,
            });
        }
        method
    }

    /// IR type of the value an expression produces
    fn ir_type_of(&self, expr: &Expression) -> IrType {
        let vararg = self.resolver.is_vararg_identifier(expr);
        IrType::from_type(&self.resolver.expr_type(expr), vararg)
    }

    /// Store a non-element value into a fresh temporary
    fn materialize(&mut self, value: Instruction, computation: &mut Vec<IrItem>) -> Element {
        if let Instruction::Single(element) = value {
            return element;
        }
        let ty = value.result_type();
        let temp = Element::operand(self.ctx.next_temp(), ty.clone());
        computation.push(IrItem::Instr(Instruction::Assign {
            dest: temp.clone(),
            ty,
            rhs: Box::new(value),
        }));
        temp
    }

    /// Lower an expression down to an element
    fn lower_to_element(
        &mut self,
        expr: &Expression,
        computation: &mut Vec<IrItem>,
    ) -> Element {
        let result = self.lower_expr(expr, &Usage::Operand);
        computation.extend(result.computation);
        self.materialize(result.value, computation)
    }

    /// Lower an expression down to an element of a known type
    fn lower_to_expected(
        &mut self,
        expr: &Expression,
        ty: IrType,
        computation: &mut Vec<IrItem>,
    ) -> Element {
        let result = self.lower_expr(expr, &Usage::Expected(ty));
        computation.extend(result.computation);
        self.materialize(result.value, computation)
    }

    /// Lower an expression down to a named operand (for indexing and length)
    fn lower_to_named(
        &mut self,
        expr: &Expression,
        computation: &mut Vec<IrItem>,
    ) -> (String, IrType) {
        match self.lower_to_element(expr, computation) {
            Element::Operand { name, ty } => (name, ty),
            other => {
                let ty = other.ty();
                let temp = self.ctx.next_temp();
                computation.push(IrItem::Instr(Instruction::Assign {
                    dest: Element::operand(&temp, ty.clone()),
                    ty: ty.clone(),
                    rhs: Box::new(Instruction::Single(other)),
                }));
                (temp, ty)
            }
        }
    }
}
