//! Per-compilation naming state
//!
//! Temporary and label names are drawn from counters that live here, one
//! counter per prefix. A context is created for each compiled unit, so names
//! never leak between compilations.

/// Name counters for one compilation
#[derive(Debug, Clone, Default)]
pub struct CompilationContext {
    temp: u32,
    varargs_array: u32,
    true_label: u32,
    end_label: u32,
    if_body: u32,
    end_if: u32,
    while_body: u32,
    end_while: u32,
}

fn bump(counter: &mut u32) -> u32 {
    let current = *counter;
    *counter += 1;
    current
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// `tmpN`
    pub fn next_temp(&mut self) -> String {
        format!("tmp{}", bump(&mut self.temp))
    }

    /// `__varargs_array_N`
    pub fn next_varargs_array(&mut self) -> String {
        format!("__varargs_array_{}", bump(&mut self.varargs_array))
    }

    /// `true_N`
    pub fn next_true_label(&mut self) -> String {
        format!("true_{}", bump(&mut self.true_label))
    }

    /// `end_N`
    pub fn next_end_label(&mut self) -> String {
        format!("end_{}", bump(&mut self.end_label))
    }

    /// `ifbody_N`
    pub fn next_if_body(&mut self) -> String {
        format!("ifbody_{}", bump(&mut self.if_body))
    }

    /// `endif_N`
    pub fn next_end_if(&mut self) -> String {
        format!("endif_{}", bump(&mut self.end_if))
    }

    /// `whilebody_N`
    pub fn next_while_body(&mut self) -> String {
        format!("whilebody_{}", bump(&mut self.while_body))
    }

    /// `endwhile_N`
    pub fn next_end_while(&mut self) -> String {
        format!("endwhile_{}", bump(&mut self.end_while))
    }
}
