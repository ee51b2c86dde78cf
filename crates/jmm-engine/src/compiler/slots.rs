//! Default variable table
//!
//! Binds every named operand of a method to a JVM local slot. The receiver
//! takes slot 0 in instance methods, parameters follow in declaration order,
//! then every other operand in order of first appearance. Methods that
//! already carry a table (supplied by an external allocator) are left alone.

use crate::compiler::ir::{
    Element, Instruction, IrClass, IrMethod, IrType, VarDescriptor, VarScope, VarTable,
};

/// Fill the variable table of every method that does not have one
pub fn assign_slots(class: &mut IrClass) {
    let class_name = class.name.clone();
    for method in class.methods.iter_mut().filter(|m| m.var_table.is_empty()) {
        method.var_table = build_table(&class_name, method);
        tracing::trace!(method = %method.name, vars = method.var_table.len(), "assigned slots");
    }
}

fn build_table(class_name: &str, method: &IrMethod) -> VarTable {
    let mut builder = SlotBuilder::default();

    if !method.is_static {
        builder.declare(
            "this",
            VarScope::This,
            IrType::Class(class_name.to_string()),
        );
    }
    for param in &method.params {
        if let Element::Operand { name, ty } = param {
            builder.declare(name, VarScope::Parameter, ty.clone());
        }
    }
    for instr in &method.instructions {
        builder.visit_instr(instr);
    }
    builder.table
}

#[derive(Default)]
struct SlotBuilder {
    table: VarTable,
    next_slot: u16,
}

impl SlotBuilder {
    fn declare(&mut self, name: &str, scope: VarScope, ty: IrType) {
        if self.table.contains(name) {
            return;
        }
        self.table.insert(
            name,
            VarDescriptor {
                scope,
                slot: self.next_slot,
                ty,
            },
        );
        self.next_slot += 1;
    }

    fn visit_instr(&mut self, instr: &Instruction) {
        match instr {
            Instruction::Assign { dest, rhs, .. } => {
                self.visit_element(dest);
                self.visit_instr(rhs);
            }
            Instruction::Single(element) => self.visit_element(element),
            Instruction::Binary { lhs, rhs, .. } => {
                self.visit_element(lhs);
                self.visit_element(rhs);
            }
            Instruction::Unary { operand, .. } => self.visit_element(operand),
            Instruction::Call(call) => {
                self.visit_element(&call.caller);
                call.args.iter().for_each(|arg| self.visit_element(arg));
            }
            Instruction::GetField { object, .. } => self.visit_element(object),
            Instruction::PutField { object, value, .. } => {
                self.visit_element(object);
                self.visit_element(value);
            }
            Instruction::Branch { cond, .. } => self.visit_instr(cond),
            Instruction::Return { value, .. } => {
                if let Some(value) = value {
                    self.visit_element(value);
                }
            }
            Instruction::Goto(_) => {}
        }
    }

    fn visit_element(&mut self, element: &Element) {
        match element {
            Element::Operand { name, ty } => self.declare(name, VarScope::Local, ty.clone()),
            Element::ArrayOperand { name, index, ty } => {
                self.declare(
                    name,
                    VarScope::Local,
                    IrType::Array(Box::new(ty.clone())),
                );
                self.visit_element(index);
            }
            Element::Literal { .. } | Element::This { .. } | Element::ClassRef(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::BinaryOp;

    fn int(name: &str) -> Element {
        Element::operand(name, IrType::Int32)
    }

    fn sample(is_static: bool) -> IrClass {
        let mut method = IrMethod::new("f", IrType::Int32);
        method.is_static = is_static;
        method.params = vec![int("a"), Element::operand("v", IrType::int_array())];
        method.push(Instruction::Assign {
            dest: int("t"),
            ty: IrType::Int32,
            rhs: Box::new(Instruction::Binary {
                op: BinaryOp::Add,
                lhs: int("a"),
                rhs: Element::ArrayOperand {
                    name: "w".into(),
                    index: Box::new(int("i")),
                    ty: IrType::Int32,
                },
                ty: IrType::Int32,
            }),
        });
        method.push(Instruction::Return {
            ty: IrType::Int32,
            value: Some(int("t")),
        });
        let mut class = IrClass::new("A");
        class.methods.push(method);
        class
    }

    fn slots(class: &IrClass) -> Vec<(String, u16, VarScope)> {
        class.methods[0]
            .var_table
            .iter()
            .map(|(name, desc)| (name.to_string(), desc.slot, desc.scope))
            .collect()
    }

    #[test]
    fn test_instance_method_reserves_receiver() {
        let mut class = sample(false);
        assign_slots(&mut class);
        assert_eq!(
            slots(&class),
            vec![
                ("this".to_string(), 0, VarScope::This),
                ("a".to_string(), 1, VarScope::Parameter),
                ("v".to_string(), 2, VarScope::Parameter),
                ("t".to_string(), 3, VarScope::Local),
                ("w".to_string(), 4, VarScope::Local),
                ("i".to_string(), 5, VarScope::Local),
            ]
        );
        let table = &class.methods[0].var_table;
        assert_eq!(table.frame_size(), 6);
        assert_eq!(table.get("w").map(|d| d.ty.clone()), Some(IrType::int_array()));
    }

    #[test]
    fn test_static_method_starts_at_zero() {
        let mut class = sample(true);
        assign_slots(&mut class);
        let table = &class.methods[0].var_table;
        assert!(!table.contains("this"));
        assert_eq!(table.get("a").map(|d| d.slot), Some(0));
        assert_eq!(table.get("i").map(|d| d.slot), Some(4));
    }

    #[test]
    fn test_supplied_table_is_kept() {
        let mut class = sample(false);
        class.methods[0].var_table.insert(
            "a",
            VarDescriptor {
                scope: VarScope::Parameter,
                slot: 7,
                ty: IrType::Int32,
            },
        );
        assign_slots(&mut class);
        assert_eq!(class.methods[0].var_table.len(), 1);
        assert_eq!(class.methods[0].var_table.get("a").map(|d| d.slot), Some(7));
    }
}
