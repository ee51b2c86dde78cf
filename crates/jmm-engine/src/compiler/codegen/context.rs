//! Code Generator Context
//!
//! Manages state during Jasmin generation from register-allocated IR.

use super::emit;
use crate::compiler::ir::{
    BinaryOp, CallInstr, CallKind, Element, Instruction, IrClass, IrMethod, IrType, UnaryOp,
    VarScope, VarTable,
};
use crate::error::{CompileError, CompileResult};
use std::fmt::Write;

/// Code generator that transforms an IR class into Jasmin text
pub struct JasminGenerator<'a> {
    class: &'a IrClass,
    /// Rewrite `x := x + k` into `iinc`
    increment_fusion: bool,
    /// Counter for `cmp_true_N`/`cmp_end_N` label pairs
    compare_labels: u32,
}

/// Context for compiling a single method
struct MethodContext<'m> {
    vars: &'m VarTable,
    /// Emitted lines; labels are unindented
    lines: Vec<String>,
    stack: i32,
    max_stack: i32,
}

impl<'m> MethodContext<'m> {
    fn new(vars: &'m VarTable) -> Self {
        Self {
            vars,
            lines: Vec::new(),
            stack: 0,
            max_stack: 0,
        }
    }

    /// Emit an instruction with its net stack effect
    fn emit(&mut self, line: impl Into<String>, delta: i32) {
        self.lines.push(format!("   {}", line.into()));
        self.stack += delta;
        self.max_stack = self.max_stack.max(self.stack);
    }

    fn label(&mut self, label: &str) {
        self.lines.push(format!("{}:", label));
    }

    fn slot(&self, name: &str) -> CompileResult<u16> {
        match self.vars.get(name) {
            Some(desc) if desc.scope == VarScope::Field => Err(CompileError::internal(format!(
                "field '{}' used as a local variable",
                name
            ))),
            Some(desc) => Ok(desc.slot),
            None => Err(CompileError::internal(format!(
                "no variable table entry for '{}'",
                name
            ))),
        }
    }
}

impl<'a> JasminGenerator<'a> {
    /// Create a new code generator
    pub fn new(class: &'a IrClass, increment_fusion: bool) -> Self {
        Self {
            class,
            increment_fusion,
            compare_labels: 0,
        }
    }

    /// Generate the Jasmin text of the class
    pub fn generate(&mut self) -> CompileResult<String> {
        let class = self.class;
        let mut out = String::new();
        let super_path = class.super_path();

        let _ = writeln!(out, ".class public {}", class.name);
        let _ = writeln!(out, ".super {}", super_path);
        out.push('\n');

        for field in &class.fields {
            let _ = writeln!(
                out,
                ".field {} {} {}",
                field.access(),
                field.name,
                emit::descriptor(&field.ty, class)
            );
        }
        if !class.fields.is_empty() {
            out.push('\n');
        }

        let _ = writeln!(out, ".method public <init>()V");
        let _ = writeln!(out, "   aload_0");
        let _ = writeln!(out, "   invokespecial {}/<init>()V", super_path);
        let _ = writeln!(out, "   return");
        let _ = writeln!(out, ".end method");

        for method in &class.methods {
            out.push('\n');
            out.push_str(&self.generate_method(method)?);
        }

        tracing::debug!(class = %class.name, methods = class.methods.len(), "generated Jasmin");
        Ok(out)
    }

    fn generate_method(&mut self, method: &IrMethod) -> CompileResult<String> {
        tracing::trace!(method = %method.name, "generating method");
        let mut ctx = MethodContext::new(&method.var_table);

        for (index, instr) in method.instructions.iter().enumerate() {
            for label in method.labels_at(index) {
                ctx.label(label);
            }
            self.generate_instr(&mut ctx, instr)?;
        }
        for label in method.labels_at(method.instructions.len()) {
            ctx.label(label);
        }

        let params: Vec<IrType> = method.params.iter().map(Element::ty).collect();
        let locals = method
            .var_table
            .frame_size()
            .max(usize::from(!method.is_static));

        let mut out = String::new();
        let _ = writeln!(
            out,
            ".method {}{} {}{}",
            if method.is_public { "public" } else { "private" },
            if method.is_static { " static" } else { "" },
            method.name,
            emit::method_descriptor(&params, &method.return_type, self.class)
        );
        let _ = writeln!(out, "   .limit stack {}", ctx.max_stack);
        let _ = writeln!(out, "   .limit locals {}", locals);
        for line in &ctx.lines {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, ".end method");
        Ok(out)
    }

    /// Instruction in statement position
    fn generate_instr(&mut self, ctx: &mut MethodContext<'_>, instr: &Instruction) -> CompileResult<()> {
        match instr {
            Instruction::Assign { dest, rhs, .. } => self.generate_assign(ctx, dest, rhs),
            Instruction::Call(call) => {
                self.generate_call(ctx, call)?;
                if !call.ret.is_void() {
                    ctx.emit("pop", -1);
                }
                Ok(())
            }
            Instruction::PutField {
                object,
                field,
                ty,
                value,
            } => {
                self.load_element(ctx, object)?;
                self.load_element(ctx, value)?;
                let owner = self.owner_path(object)?;
                let desc = emit::descriptor(ty, self.class);
                ctx.emit(format!("putfield {}/{} {}", owner, field, desc), -2);
                Ok(())
            }
            Instruction::Branch { cond, label } => self.generate_branch(ctx, cond, label),
            Instruction::Goto(label) => {
                ctx.emit(format!("goto {}", label), 0);
                Ok(())
            }
            Instruction::Return { ty, value } => {
                if let Some(value) = value {
                    self.load_element(ctx, value)?;
                    ctx.emit(emit::return_for(ty), -1);
                } else {
                    ctx.emit("return", 0);
                }
                Ok(())
            }
            Instruction::Single(_)
            | Instruction::Binary { .. }
            | Instruction::Unary { .. }
            | Instruction::GetField { .. } => {
                self.generate_value(ctx, instr)?;
                ctx.emit("pop", -1);
                Ok(())
            }
        }
    }

    fn generate_assign(
        &mut self,
        ctx: &mut MethodContext<'_>,
        dest: &Element,
        rhs: &Instruction,
    ) -> CompileResult<()> {
        if self.increment_fusion {
            if let Some((slot, step)) = self.increment(ctx, dest, rhs)? {
                ctx.emit(format!("iinc {} {}", slot, step), 0);
                return Ok(());
            }
        }

        match dest {
            Element::Operand { name, ty } => {
                let slot = ctx.slot(name)?;
                self.generate_value(ctx, rhs)?;
                ctx.emit(emit::store(ty, slot), -1);
                Ok(())
            }
            Element::ArrayOperand { name, index, ty } => {
                let slot = ctx.slot(name)?;
                ctx.emit(emit::load(&IrType::Array(Box::new(ty.clone())), slot), 1);
                self.load_element(ctx, index)?;
                self.generate_value(ctx, rhs)?;
                ctx.emit(emit::array_store(ty), -3);
                Ok(())
            }
            other => Err(CompileError::internal(format!(
                "cannot assign to '{}'",
                other
            ))),
        }
    }

    /// Slot and step when `dest := dest + k`, `dest := k + dest` or
    /// `dest := dest - k` fits a single `iinc`
    fn increment(
        &self,
        ctx: &MethodContext<'_>,
        dest: &Element,
        rhs: &Instruction,
    ) -> CompileResult<Option<(u16, i32)>> {
        let Element::Operand { name, ty: IrType::Int32 } = dest else {
            return Ok(None);
        };
        let Instruction::Binary { op, lhs, rhs, .. } = rhs else {
            return Ok(None);
        };
        let same = |element: &Element| {
            matches!(element, Element::Operand { name: n, ty: IrType::Int32 } if n == name)
        };

        let (literal, negate) = match op {
            BinaryOp::Add if same(lhs) => (rhs, false),
            BinaryOp::Add if same(rhs) => (lhs, false),
            BinaryOp::Sub if same(lhs) => (rhs, true),
            _ => return Ok(None),
        };
        let Element::Literal { value, ty } = literal else {
            return Ok(None);
        };
        if *ty != IrType::Int32 {
            return Err(CompileError::internal(format!(
                "non-integer literal '{}' in increment of '{}'",
                literal, name
            )));
        }

        let step = if negate { value.checked_neg() } else { Some(*value) };
        match step {
            Some(step) if (-128..=127).contains(&step) => Ok(Some((ctx.slot(name)?, step))),
            _ => Ok(None),
        }
    }

    fn generate_branch(
        &mut self,
        ctx: &mut MethodContext<'_>,
        cond: &Instruction,
        label: &str,
    ) -> CompileResult<()> {
        match cond {
            Instruction::Binary {
                op: BinaryOp::LessThan,
                lhs,
                rhs,
                ..
            } => {
                self.load_element(ctx, lhs)?;
                self.load_element(ctx, rhs)?;
                ctx.emit(format!("if_icmplt {}", label), -2);
            }
            Instruction::Unary {
                op: UnaryOp::Not,
                operand,
                ..
            } => {
                self.load_element(ctx, operand)?;
                ctx.emit(format!("ifeq {}", label), -1);
            }
            other => {
                self.generate_value(ctx, other)?;
                ctx.emit(format!("ifne {}", label), -1);
            }
        }
        Ok(())
    }

    /// Instruction that leaves exactly one value on the stack
    fn generate_value(&mut self, ctx: &mut MethodContext<'_>, instr: &Instruction) -> CompileResult<()> {
        match instr {
            Instruction::Single(element) => self.load_element(ctx, element),
            Instruction::Binary { op, lhs, rhs, .. } => {
                self.load_element(ctx, lhs)?;
                self.load_element(ctx, rhs)?;
                let mnemonic = match op {
                    BinaryOp::Add => "iadd",
                    BinaryOp::Sub => "isub",
                    BinaryOp::Mul => "imul",
                    BinaryOp::Div => "idiv",
                    BinaryOp::And => "iand",
                    BinaryOp::Or => "ior",
                    BinaryOp::LessThan => {
                        self.generate_comparison(ctx);
                        return Ok(());
                    }
                };
                ctx.emit(mnemonic, -1);
                Ok(())
            }
            Instruction::Unary {
                op: UnaryOp::Not,
                operand,
                ..
            } => {
                self.load_element(ctx, operand)?;
                ctx.emit("iconst_1", 1);
                ctx.emit("ixor", -1);
                Ok(())
            }
            Instruction::Call(call) => {
                if call.ret.is_void() {
                    return Err(CompileError::internal(format!(
                        "void call '{}' used as a value",
                        call
                    )));
                }
                self.generate_call(ctx, call)
            }
            Instruction::GetField { object, field, ty } => {
                self.load_element(ctx, object)?;
                let owner = self.owner_path(object)?;
                let desc = emit::descriptor(ty, self.class);
                ctx.emit(format!("getfield {}/{} {}", owner, field, desc), 0);
                Ok(())
            }
            other => Err(CompileError::internal(format!(
                "'{}' does not produce a value",
                other
            ))),
        }
    }

    /// Turn the two compared ints on the stack into 0 or 1
    fn generate_comparison(&mut self, ctx: &mut MethodContext<'_>) {
        let id = self.compare_labels;
        self.compare_labels += 1;
        let true_label = format!("cmp_true_{}", id);
        let end_label = format!("cmp_end_{}", id);

        ctx.emit(format!("if_icmplt {}", true_label), -2);
        ctx.emit("iconst_0", 1);
        ctx.emit(format!("goto {}", end_label), 0);
        ctx.label(&true_label);
        // Only one of the two constants reaches the join point
        ctx.stack -= 1;
        ctx.emit("iconst_1", 1);
        ctx.label(&end_label);
    }

    /// Emit a call; non-void calls leave their result on the stack
    fn generate_call(&mut self, ctx: &mut MethodContext<'_>, call: &CallInstr) -> CompileResult<()> {
        match call.kind {
            CallKind::New if call.is_array_new() => {
                let [size] = call.args.as_slice() else {
                    return Err(CompileError::internal("array allocation needs one size"));
                };
                self.load_element(ctx, size)?;
                ctx.emit("newarray int", 0);
            }
            CallKind::New => {
                let Element::ClassRef(name) = &call.caller else {
                    return Err(CompileError::internal(format!(
                        "cannot instantiate '{}'",
                        call.caller
                    )));
                };
                ctx.emit(format!("new {}", self.class.class_path(name)), 1);
            }
            CallKind::ArrayLength => {
                self.load_element(ctx, &call.caller)?;
                ctx.emit("arraylength", 0);
            }
            CallKind::InvokeSpecial => {
                self.load_element(ctx, &call.caller)?;
                let owner = self.owner_path(&call.caller)?;
                ctx.emit(format!("invokespecial {}/<init>()V", owner), -1);
            }
            CallKind::InvokeVirtual | CallKind::InvokeStatic => {
                let is_static = call.kind == CallKind::InvokeStatic
                    || matches!(call.caller, Element::ClassRef(_));
                if !is_static {
                    self.load_element(ctx, &call.caller)?;
                }
                for arg in &call.args {
                    self.load_element(ctx, arg)?;
                }

                let method = call
                    .method
                    .as_deref()
                    .ok_or_else(|| CompileError::internal(format!("call '{}' names no method", call)))?;
                let arg_types: Vec<IrType> = call.args.iter().map(Element::ty).collect();
                let desc = emit::method_descriptor(&arg_types, &call.ret, self.class);
                let owner = self.owner_path(&call.caller)?;

                let popped = call.args.len() as i32 + i32::from(!is_static);
                let pushed = i32::from(!call.ret.is_void());
                let mnemonic = if is_static { "invokestatic" } else { "invokevirtual" };
                ctx.emit(format!("{} {}/{}{}", mnemonic, owner, method, desc), pushed - popped);
            }
        }
        Ok(())
    }

    fn load_element(&mut self, ctx: &mut MethodContext<'_>, element: &Element) -> CompileResult<()> {
        match element {
            Element::Literal { value, .. } => ctx.emit(emit::push_int(*value), 1),
            Element::Operand { name, ty } => {
                let slot = ctx.slot(name)?;
                ctx.emit(emit::load(ty, slot), 1);
            }
            Element::ArrayOperand { name, index, ty } => {
                let slot = ctx.slot(name)?;
                ctx.emit(emit::load(&IrType::Array(Box::new(ty.clone())), slot), 1);
                self.load_element(ctx, index)?;
                ctx.emit(emit::array_load(ty), -1);
            }
            Element::This { .. } => ctx.emit("aload_0", 1),
            Element::ClassRef(name) => {
                return Err(CompileError::internal(format!(
                    "class reference '{}' cannot be loaded",
                    name
                )))
            }
        }
        Ok(())
    }

    /// Class path that owns a member accessed through `element`
    fn owner_path(&self, element: &Element) -> CompileResult<String> {
        match element.ty() {
            IrType::Class(name) => Ok(self.class.class_path(&name)),
            other => Err(CompileError::internal(format!(
                "'{}' of type {} has no members",
                element, other
            ))),
        }
    }
}
