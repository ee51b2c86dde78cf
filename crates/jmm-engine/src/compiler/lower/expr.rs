//! Expression Lowering
//!
//! Converts AST expressions to IR values plus the instructions that compute
//! them.

use super::{ExprResult, Lowerer, Usage};
use crate::ast::{self, BinaryOperator, Expression};
use crate::compiler::ir::{
    BinaryOp, CallInstr, CallKind, Element, Instruction, IrItem, IrType, UnaryOp,
};
use crate::semantic::Type;

impl<'a, 'c> Lowerer<'a, 'c> {
    /// Lower an expression for the given use site
    pub(crate) fn lower_expr(&mut self, expr: &Expression, usage: &Usage) -> ExprResult {
        match expr {
            Expression::IntLiteral(lit) => ExprResult::element(Element::int(lit.value)),
            Expression::BooleanLiteral(lit) => ExprResult::element(Element::boolean(lit.value)),
            Expression::Identifier(id) => self.lower_identifier(&id.name),
            Expression::This(_) => ExprResult::element(self.this_element()),
            Expression::Paren(paren) => self.lower_expr(&paren.inner, &usage.through_paren()),
            Expression::ArrayLiteral(array) => self.lower_int_array(&array.elements, IrType::Int32),
            Expression::Not(not) => {
                let operand = self.lower_expr(&not.operand, &Usage::Operand);
                let mut computation = operand.computation;
                let operand = self.materialize(operand.value, &mut computation);
                ExprResult::new(
                    Instruction::Unary {
                        op: UnaryOp::Not,
                        operand,
                        ty: IrType::Boolean,
                    },
                    computation,
                )
            }
            Expression::Index(index) => self.lower_index(index, usage),
            Expression::Binary(binary) => self.lower_binary(expr, binary, usage),
            Expression::Call(call) => self.lower_call(expr, call, usage),
            Expression::NewArray(new_array) => {
                let mut computation = Vec::new();
                let size = self.lower_to_element(&new_array.size, &mut computation);
                let call = CallInstr {
                    kind: CallKind::New,
                    caller: Element::ClassRef("array".to_string()),
                    method: None,
                    args: vec![size],
                    ret: IrType::int_array(),
                };
                ExprResult::new(Instruction::Call(call), computation)
            }
            Expression::New(new) => self.lower_new(&new.class_name),
            Expression::Length(length) => {
                let mut computation = Vec::new();
                let (name, ty) = self.lower_to_named(&length.array, &mut computation);
                let call = CallInstr {
                    kind: CallKind::ArrayLength,
                    caller: Element::operand(name, ty),
                    method: None,
                    args: Vec::new(),
                    ret: IrType::Int32,
                };
                let value = self.materialize(Instruction::Call(call), &mut computation);
                ExprResult::new(Instruction::Single(value), computation)
            }
        }
    }

    fn this_element(&self) -> Element {
        Element::This {
            class: self.table.class_name().to_string(),
        }
    }

    /// Imports become class references, fields are read through `getfield`
    fn lower_identifier(&mut self, name: &str) -> ExprResult {
        if self.table.is_import(name) {
            return ExprResult::element(Element::ClassRef(name.to_string()));
        }

        let vararg = self.scopes.is_vararg(name, &self.decl.name);
        let ty = IrType::from_type(&self.resolver.identifier_type(name), vararg);

        if self.scopes.resolves_to_field(name, &self.decl.name) {
            let mut computation = Vec::new();
            let read = Instruction::GetField {
                object: self.this_element(),
                field: name.to_string(),
                ty,
            };
            let value = self.materialize(read, &mut computation);
            return ExprResult::new(Instruction::Single(value), computation);
        }

        ExprResult::element(Element::operand(name, ty))
    }

    fn lower_index(&mut self, index: &ast::IndexExpression, usage: &Usage) -> ExprResult {
        let mut computation = Vec::new();
        let (name, array_ty) = self.lower_to_named(&index.array, &mut computation);
        let position = self.lower_to_element(&index.index, &mut computation);
        let ty = array_ty.element().cloned().unwrap_or(IrType::Int32);

        let access = Element::ArrayOperand {
            name,
            index: Box::new(position),
            ty,
        };
        if matches!(usage, Usage::Assign(_)) {
            return ExprResult::new(Instruction::Single(access), computation);
        }

        let ty = access.ty();
        let temp = Element::operand(self.ctx.next_temp(), ty.clone());
        computation.push(IrItem::Instr(Instruction::Assign {
            dest: temp.clone(),
            ty,
            rhs: Box::new(Instruction::Single(access)),
        }));
        ExprResult::new(Instruction::Single(temp), computation)
    }

    fn lower_binary(
        &mut self,
        expr: &Expression,
        binary: &ast::BinaryExpression,
        usage: &Usage,
    ) -> ExprResult {
        let lhs = self.lower_expr(&binary.left, &Usage::Operand);
        let rhs = self.lower_expr(&binary.right, &Usage::Operand);
        let ty = self.ir_type_of(expr);

        match binary.operator {
            BinaryOperator::And => return self.lower_short_circuit(lhs, rhs, ty, false),
            BinaryOperator::Or => return self.lower_short_circuit(lhs, rhs, ty, true),
            _ => {}
        }

        let mut computation = lhs.computation;
        let left = self.materialize(lhs.value, &mut computation);
        computation.extend(rhs.computation);
        let right = self.materialize(rhs.value, &mut computation);

        let operation = Instruction::Binary {
            op: BinaryOp::from(binary.operator),
            lhs: left,
            rhs: right,
            ty,
        };

        if !binary.left.is_binary() && !binary.right.is_binary() && usage.is_inline_site() {
            return ExprResult::new(operation, computation);
        }

        let value = self.materialize(operation, &mut computation);
        ExprResult::new(Instruction::Single(value), computation)
    }

    /// Lower `&&` (or `||` when `is_or`) into explicit branches
    ///
    /// The right operand only runs on the path where the left operand does
    /// not already decide the result.
    fn lower_short_circuit(
        &mut self,
        lhs: ExprResult,
        rhs: ExprResult,
        ty: IrType,
        is_or: bool,
    ) -> ExprResult {
        let true_label = self.ctx.next_true_label();
        let end_label = self.ctx.next_end_label();
        let result = Element::operand(self.ctx.next_temp(), ty.clone());
        let assign = |value: Instruction| {
            IrItem::Instr(Instruction::Assign {
                dest: result.clone(),
                ty: ty.clone(),
                rhs: Box::new(value),
            })
        };

        let mut computation = lhs.computation;
        computation.push(IrItem::Instr(Instruction::Branch {
            cond: Box::new(lhs.value),
            label: true_label.clone(),
        }));

        if is_or {
            computation.extend(rhs.computation);
            computation.push(assign(rhs.value));
            computation.push(IrItem::Instr(Instruction::Goto(end_label.clone())));
            computation.push(IrItem::Label(true_label));
            computation.push(assign(Instruction::Single(Element::boolean(true))));
        } else {
            computation.push(assign(Instruction::Single(Element::boolean(false))));
            computation.push(IrItem::Instr(Instruction::Goto(end_label.clone())));
            computation.push(IrItem::Label(true_label));
            computation.extend(rhs.computation);
            computation.push(assign(rhs.value));
        }
        computation.push(IrItem::Label(end_label));

        ExprResult::new(Instruction::Single(result), computation)
    }

    /// Allocate an int array and store each element
    ///
    /// Used for array literals and for packing vararg arguments.
    fn lower_int_array(&mut self, elements: &[Expression], element_ty: IrType) -> ExprResult {
        let array_ty = IrType::Array(Box::new(element_ty.clone()));
        let allocation = Element::operand(self.ctx.next_temp(), array_ty.clone());
        let mut computation = vec![IrItem::Instr(Instruction::Assign {
            dest: allocation.clone(),
            ty: array_ty.clone(),
            rhs: Box::new(Instruction::Call(CallInstr {
                kind: CallKind::New,
                caller: Element::ClassRef("array".to_string()),
                method: None,
                args: vec![Element::int(elements.len() as i32)],
                ret: array_ty.clone(),
            })),
        })];

        if elements.is_empty() {
            return ExprResult::new(Instruction::Single(allocation), computation);
        }

        let name = self.ctx.next_varargs_array();
        computation.push(IrItem::Instr(Instruction::Assign {
            dest: Element::operand(&name, array_ty.clone()),
            ty: array_ty.clone(),
            rhs: Box::new(Instruction::Single(allocation)),
        }));

        for (position, element) in elements.iter().enumerate() {
            let value = self.lower_to_expected(element, element_ty.clone(), &mut computation);
            computation.push(IrItem::Instr(Instruction::Assign {
                dest: Element::ArrayOperand {
                    name: name.clone(),
                    index: Box::new(Element::int(position as i32)),
                    ty: element_ty.clone(),
                },
                ty: element_ty.clone(),
                rhs: Box::new(Instruction::Single(value)),
            }));
        }

        ExprResult::new(
            Instruction::Single(Element::operand(name, array_ty)),
            computation,
        )
    }

    /// `tmp.C :=.C new(C).C; invokespecial(tmp.C, "<init>").V;`
    fn lower_new(&mut self, class_name: &str) -> ExprResult {
        let ty = IrType::Class(class_name.to_string());
        let mut computation = Vec::new();
        let allocation = Instruction::Call(CallInstr {
            kind: CallKind::New,
            caller: Element::ClassRef(class_name.to_string()),
            method: None,
            args: Vec::new(),
            ret: ty,
        });
        let object = self.materialize(allocation, &mut computation);
        computation.push(IrItem::Instr(Instruction::Call(CallInstr {
            kind: CallKind::InvokeSpecial,
            caller: object.clone(),
            method: Some("<init>".to_string()),
            args: Vec::new(),
            ret: IrType::Void,
        })));
        ExprResult::new(Instruction::Single(object), computation)
    }

    fn lower_call(
        &mut self,
        expr: &Expression,
        call: &ast::CallExpression,
        usage: &Usage,
    ) -> ExprResult {
        let mut computation = Vec::new();

        let package_receiver = self.resolver.names_import(&call.receiver);
        let caller = self.lower_to_element(&call.receiver, &mut computation);
        let args = self.lower_arguments(call, &mut computation);

        // A call typed `void` (imported receiver) that is used as a value
        // takes the type its use site expects
        let mut ret = self.ir_type_of(expr);
        if ret.is_void() {
            ret = match usage {
                Usage::Assign(target) | Usage::Expected(target) => target.clone(),
                Usage::Condition => IrType::Boolean,
                Usage::Operand => IrType::Int32,
                Usage::Statement => IrType::Void,
            };
        }

        let mut instr = CallInstr {
            kind: CallKind::InvokeVirtual,
            caller,
            method: Some(call.method.clone()),
            args,
            ret,
        };

        if *usage == Usage::Statement {
            if package_receiver {
                instr.kind = CallKind::InvokeStatic;
                instr.ret = IrType::Void;
            }
            return ExprResult::new(Instruction::Call(instr), computation);
        }

        let value = self.materialize(Instruction::Call(instr), &mut computation);
        ExprResult::new(Instruction::Single(value), computation)
    }

    /// Lower actual arguments, packing them into one array when the callee
    /// declares a single vararg parameter
    ///
    /// Arguments to a method of this class are lowered against the declared
    /// formal types; extra arguments and calls elsewhere use plain operands.
    fn lower_arguments(
        &mut self,
        call: &ast::CallExpression,
        computation: &mut Vec<IrItem>,
    ) -> Vec<Element> {
        let on_this_class = matches!(
            self.resolver.expr_type(&call.receiver),
            Type::Named(name) if name == self.table.class_name()
        );
        let formals: Vec<(IrType, bool)> = on_this_class
            .then(|| self.table.method(&call.method))
            .flatten()
            .map(|signature| {
                signature
                    .params
                    .iter()
                    .map(|param| (IrType::from_type(&param.ty, param.is_vararg), param.is_vararg))
                    .collect()
            })
            .unwrap_or_default();

        let passes_array = matches!(call.arguments.as_slice(), [only] if self.ir_type_of(only).is_array());

        match formals.as_slice() {
            [(array_ty, true)] if !passes_array => {
                let element_ty = array_ty.element().cloned().unwrap_or(IrType::Int32);
                let packed = self.lower_int_array(&call.arguments, element_ty);
                computation.extend(packed.computation);
                vec![self.materialize(packed.value, computation)]
            }
            _ => call
                .arguments
                .iter()
                .enumerate()
                .map(|(position, arg)| {
                    let formal = formals
                        .get(position)
                        .or_else(|| formals.last().filter(|(_, is_vararg)| *is_vararg));
                    match formal {
                        Some((ty, true)) => {
                            let element = ty.element().cloned().unwrap_or_else(|| ty.clone());
                            self.lower_to_expected(arg, element, computation)
                        }
                        Some((ty, false)) => self.lower_to_expected(arg, ty.clone(), computation),
                        None => self.lower_to_element(arg, computation),
                    }
                })
                .collect(),
        }
    }
}
