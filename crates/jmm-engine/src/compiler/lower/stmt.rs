//! Statement Lowering
//!
//! Converts AST statements to IR instructions and labels.

use super::{Lowerer, Usage};
use crate::ast::{self, Expression, Statement};
use crate::compiler::ir::{Element, Instruction, IrItem, IrType};
use crate::semantic::Type;

impl<'a, 'c> Lowerer<'a, 'c> {
    /// Lower a statement
    pub(crate) fn lower_stmt(&mut self, stmt: &Statement) -> Vec<IrItem> {
        match stmt {
            Statement::Assign(assign) => self.lower_assign(assign),
            Statement::Expr(expr) => self.lower_expr_stmt(&expr.expr),
            Statement::Return(ret) => self.lower_return(ret),
            Statement::If(if_stmt) => self.lower_if(if_stmt),
            Statement::While(while_stmt) => self.lower_while(while_stmt),
        }
    }

    fn lower_block(&mut self, stmts: &[Statement]) -> Vec<IrItem> {
        stmts.iter().flat_map(|stmt| self.lower_stmt(stmt)).collect()
    }

    fn lower_assign(&mut self, assign: &ast::AssignStmt) -> Vec<IrItem> {
        let mut items = Vec::new();

        match &assign.target {
            Expression::Identifier(id) if self.scopes.resolves_to_field(&id.name, &self.decl.name) => {
                let ty = self.ir_type_of(&assign.target);
                let value = self.lower_to_expected(&assign.value, ty.clone(), &mut items);
                items.push(IrItem::Instr(Instruction::PutField {
                    object: Element::This {
                        class: self.table.class_name().to_string(),
                    },
                    field: id.name.clone(),
                    ty,
                    value,
                }));
            }
            Expression::Identifier(id) => {
                let ty = self.ir_type_of(&assign.target);
                let value = self.lower_expr(&assign.value, &Usage::Assign(ty.clone()));
                items.extend(value.computation);
                items.push(IrItem::Instr(Instruction::Assign {
                    dest: Element::operand(&id.name, ty.clone()),
                    ty,
                    rhs: Box::new(value.value),
                }));
            }
            Expression::Index(index) => {
                let (name, array_ty) = self.lower_to_named(&index.array, &mut items);
                let position = self.lower_to_element(&index.index, &mut items);
                let ty = array_ty.element().cloned().unwrap_or(IrType::Int32);
                let value = self.lower_expr(&assign.value, &Usage::Assign(ty.clone()));
                items.extend(value.computation);
                items.push(IrItem::Instr(Instruction::Assign {
                    dest: Element::ArrayOperand {
                        name,
                        index: Box::new(position),
                        ty: ty.clone(),
                    },
                    ty,
                    rhs: Box::new(value.value),
                }));
            }
            other => {
                tracing::warn!(span = %other.span(), "assignment target is not a variable; only the value is lowered");
                let value = self.lower_expr(&assign.value, &Usage::Operand);
                items.extend(value.computation);
            }
        }
        items
    }

    /// Only calls survive as instructions; other values are dropped
    fn lower_expr_stmt(&mut self, expr: &Expression) -> Vec<IrItem> {
        let result = self.lower_expr(expr, &Usage::Statement);
        let mut items = result.computation;
        if let Instruction::Call(_) = result.value {
            items.push(IrItem::Instr(result.value));
        }
        items
    }

    fn lower_return(&mut self, ret: &ast::ReturnStmt) -> Vec<IrItem> {
        let ty = IrType::from_type(&Type::from_annotation(&self.decl.return_type), false);
        let mut items = Vec::new();
        let value = ret
            .value
            .as_ref()
            .map(|value| self.lower_to_element(value, &mut items));
        items.push(IrItem::Instr(Instruction::Return { ty, value }));
        items
    }

    /// `if (c) goto ifbody; <else>; goto endif; ifbody: <then>; endif:`
    fn lower_if(&mut self, if_stmt: &ast::IfStmt) -> Vec<IrItem> {
        let body_label = self.ctx.next_if_body();
        let end_label = self.ctx.next_end_if();

        let condition = self.lower_expr(&if_stmt.condition, &Usage::Condition);
        let mut items = condition.computation;
        items.push(IrItem::Instr(Instruction::Branch {
            cond: Box::new(condition.value),
            label: body_label.clone(),
        }));
        items.extend(self.lower_block(&if_stmt.else_branch));
        items.push(IrItem::Instr(Instruction::Goto(end_label.clone())));
        items.push(IrItem::Label(body_label));
        items.extend(self.lower_block(&if_stmt.then_branch));
        items.push(IrItem::Label(end_label));
        items
    }

    /// The condition is computed once; its value is tested at entry and at
    /// the bottom of the body
    fn lower_while(&mut self, while_stmt: &ast::WhileStmt) -> Vec<IrItem> {
        let condition = self.lower_expr(&while_stmt.condition, &Usage::Condition);
        let body_label = self.ctx.next_while_body();
        let end_label = self.ctx.next_end_while();

        let mut items = condition.computation;
        items.push(IrItem::Instr(Instruction::Branch {
            cond: Box::new(condition.value.clone()),
            label: body_label.clone(),
        }));
        items.push(IrItem::Instr(Instruction::Goto(end_label.clone())));
        items.push(IrItem::Label(body_label.clone()));
        items.extend(self.lower_block(&while_stmt.body));
        items.push(IrItem::Instr(Instruction::Branch {
            cond: Box::new(condition.value),
            label: body_label,
        }));
        items.push(IrItem::Label(end_label));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::lower;
    use crate::ast::build::*;
    use crate::compiler::ir::PrettyPrint;

    fn run_body(stmts: Vec<crate::ast::Statement>) -> String {
        let mut method = MethodBuilder::new("run")
            .returns(int_ty())
            .local("a", int_ty())
            .local("i", int_ty())
            .local("r", int_ty());
        for stmt in stmts {
            method = method.stmt(stmt);
        }
        let class = lower(&program(&[], ClassBuilder::new("A").method(method.build()).build()));
        let text = class.method("run").unwrap().pretty_print();
        text.lines()
            .skip(1)
            .take_while(|line| *line != "}")
            .map(|line| format!("{}\n", line))
            .collect()
    }

    #[test]
    fn test_if_else_places_else_first() {
        let text = run_body(vec![
            if_else(
                less(ident("a"), ident("i")),
                vec![assign_var("r", int(1))],
                vec![assign_var("r", int(0))],
            ),
            ret(ident("r")),
        ]);
        assert_eq!(
            text,
            "if (a.i32 <.bool i.i32) goto ifbody_0;\n\
             r.i32 :=.i32 0.i32;\n\
             goto endif_0;\n\
             ifbody_0:\n\
             r.i32 :=.i32 1.i32;\n\
             endif_0:\n\
             ret.i32 r.i32;\n"
        );
    }

    #[test]
    fn test_while_reuses_condition() {
        let text = run_body(vec![
            while_loop(
                less(ident("i"), ident("a")),
                vec![assign_var("i", add(ident("i"), int(1)))],
            ),
            ret(ident("i")),
        ]);
        assert_eq!(
            text,
            "if (i.i32 <.bool a.i32) goto whilebody_0;\n\
             goto endwhile_0;\n\
             whilebody_0:\n\
             i.i32 :=.i32 i.i32 +.i32 1.i32;\n\
             if (i.i32 <.bool a.i32) goto whilebody_0;\n\
             endwhile_0:\n\
             ret.i32 i.i32;\n"
        );
    }

    #[test]
    fn test_nested_labels_are_distinct() {
        let text = run_body(vec![
            if_else(
                boolean(true),
                vec![if_else(boolean(false), vec![], vec![])],
                vec![],
            ),
            ret(int(0)),
        ]);
        assert!(text.contains("goto ifbody_0;"));
        assert!(text.contains("goto ifbody_1;"));
        assert!(text.contains("endif_1:\nendif_0:\n"));
    }

    #[test]
    fn test_return_materializes_binary() {
        let text = run_body(vec![ret(add(ident("a"), int(2)))]);
        assert_eq!(text, "tmp0.i32 :=.i32 a.i32 +.i32 2.i32;\nret.i32 tmp0.i32;\n");
    }

    #[test]
    fn test_array_store() {
        let mut method = MethodBuilder::new("run")
            .local("arr", crate::ast::TypeAnnotation::array_of("int"))
            .local("i", int_ty());
        method = method.stmt(assign(index(ident("arr"), ident("i")), add(ident("i"), int(1))));
        let class = lower(&program(&[], ClassBuilder::new("A").method(method.build()).build()));
        let text = class.method("run").unwrap().pretty_print();
        assert!(text.contains("arr.array.i32[i.i32].i32 :=.i32 i.i32 +.i32 1.i32;\n"));
    }
}
