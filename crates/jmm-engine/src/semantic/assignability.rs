//! Assignability and call-argument reconciliation

use super::symbols::{Symbol, SymbolTable};
use super::types::Type;

/// True if the type comes from an import and cannot be analyzed
pub fn is_external(table: &SymbolTable, ty: &Type) -> bool {
    match ty {
        Type::Imported => true,
        Type::Named(name) => table.is_import(name),
        _ => false,
    }
}

/// Check if a value of type `source` can be stored in `dest`
///
/// Array-to-array assignment never compares element types.
pub fn can_assign(table: &SymbolTable, source: &Type, dest: &Type) -> bool {
    if is_external(table, source) && is_external(table, dest) {
        return true;
    }
    if extends_each_other(table, source, dest) {
        return true;
    }
    if source.is_array() && dest.is_array() {
        return true;
    }
    source.name() == dest.name()
}

fn extends_each_other(table: &SymbolTable, a: &Type, b: &Type) -> bool {
    let Some(superclass) = table.superclass() else {
        return false;
    };
    let class = table.class_name();
    let is = |ty: &Type, name: &str| matches!(ty, Type::Named(n) if n == name);
    (is(a, class) && is(b, superclass)) || (is(a, superclass) && is(b, class))
}

/// Check actual argument types against declared formals
///
/// Only the declared formals are checked; extra actuals after the last
/// fixed formal are ignored. A trailing vararg formal may be left empty, may
/// take a single array of its element type, or may take a run of one
/// uniform non-array type equal to its element type.
pub fn reconcile_arguments(table: &SymbolTable, formals: &[Symbol], actuals: &[Type]) -> bool {
    let vararg = formals.last().filter(|formal| formal.is_vararg);
    let fixed = if vararg.is_some() {
        &formals[..formals.len() - 1]
    } else {
        formals
    };

    if actuals.len() < fixed.len() {
        return false;
    }
    let fixed_ok = fixed
        .iter()
        .zip(actuals)
        .all(|(formal, actual)| can_assign(table, actual, &formal.ty));
    if !fixed_ok {
        return false;
    }

    let rest = &actuals[fixed.len()..];
    match vararg {
        None => true,
        Some(formal) => match rest {
            [] => true,
            [single] if single.is_array() => single.element_type().as_ref() == Some(&formal.ty),
            [first, ..] => rest.iter().all(|ty| ty == first && !ty.is_array()) && *first == formal.ty,
        },
    }
}
