//! Jasmin Emission Helpers
//!
//! Mnemonic selection for constants, locals and returns, plus JVM type
//! descriptors.

use crate::compiler::ir::{IrClass, IrType};

/// Instruction that pushes an integer constant
pub fn push_int(value: i32) -> String {
    match value {
        -1 => "iconst_m1".to_string(),
        0..=5 => format!("iconst_{}", value),
        -128..=127 => format!("bipush {}", value),
        -32768..=32767 => format!("sipush {}", value),
        _ => format!("ldc {}", value),
    }
}

fn with_slot(mnemonic: &str, slot: u16) -> String {
    if slot < 4 {
        format!("{}_{}", mnemonic, slot)
    } else {
        format!("{} {}", mnemonic, slot)
    }
}

/// Local variable load for a value of type `ty`
pub fn load(ty: &IrType, slot: u16) -> String {
    let prefix = if ty.is_reference() { "a" } else { "i" };
    with_slot(&format!("{}load", prefix), slot)
}

/// Local variable store for a value of type `ty`
pub fn store(ty: &IrType, slot: u16) -> String {
    let prefix = if ty.is_reference() { "a" } else { "i" };
    with_slot(&format!("{}store", prefix), slot)
}

/// Array element load for elements of type `element`
pub fn array_load(element: &IrType) -> &'static str {
    match element {
        IrType::Boolean => "baload",
        ty if ty.is_reference() => "aaload",
        _ => "iaload",
    }
}

/// Array element store for elements of type `element`
pub fn array_store(element: &IrType) -> &'static str {
    match element {
        IrType::Boolean => "bastore",
        ty if ty.is_reference() => "aastore",
        _ => "iastore",
    }
}

/// Method return for type `ty`
pub fn return_for(ty: &IrType) -> &'static str {
    match ty {
        IrType::Void => "return",
        ty if ty.is_reference() => "areturn",
        _ => "ireturn",
    }
}

/// JVM descriptor of `ty`; class names are qualified through `class`'s imports
pub fn descriptor(ty: &IrType, class: &IrClass) -> String {
    match ty {
        IrType::Int32 => "I".to_string(),
        IrType::Boolean => "Z".to_string(),
        IrType::Void => "V".to_string(),
        IrType::String => "Ljava/lang/String;".to_string(),
        IrType::Class(name) => format!("L{};", class.class_path(name)),
        IrType::Array(element) => format!("[{}", descriptor(element, class)),
    }
}

/// Method descriptor `(params)ret`
pub fn method_descriptor<'t>(
    params: impl IntoIterator<Item = &'t IrType>,
    ret: &IrType,
    class: &IrClass,
) -> String {
    let params: String = params
        .into_iter()
        .map(|ty| descriptor(ty, class))
        .collect();
    format!("({}){}", params, descriptor(ret, class))
}
