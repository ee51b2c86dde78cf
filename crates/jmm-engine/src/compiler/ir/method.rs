//! IR methods and variable tables

use super::instr::Instruction;
use super::value::{Element, IrType};
use rustc_hash::FxHashMap;

/// Item produced by lowering: a label or an instruction
#[derive(Debug, Clone, PartialEq)]
pub enum IrItem {
    Label(String),
    Instr(Instruction),
}

/// Where a variable lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarScope {
    This,
    Parameter,
    Local,
    Field,
}

/// Slot binding of one variable
#[derive(Debug, Clone, PartialEq)]
pub struct VarDescriptor {
    pub scope: VarScope,
    pub slot: u16,
    pub ty: IrType,
}

/// Variable name to slot table of one method, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarTable {
    entries: FxHashMap<String, VarDescriptor>,
    order: Vec<String>,
}

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`; an existing binding is kept
    pub fn insert(&mut self, name: impl Into<String>, descriptor: VarDescriptor) {
        let name = name.into();
        if !self.entries.contains_key(&name) {
            self.order.push(name.clone());
            self.entries.insert(name, descriptor);
        }
    }

    pub fn get(&self, name: &str) -> Option<&VarDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarDescriptor)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|desc| (name.as_str(), desc)))
    }

    /// Local slots a frame needs: one past the highest bound slot
    ///
    /// Counts the receiver, parameters and locals; slots shared by several
    /// names or left unused below the highest one are covered too.
    pub fn frame_size(&self) -> usize {
        self.entries
            .values()
            .filter(|desc| desc.scope != VarScope::Field)
            .map(|desc| usize::from(desc.slot) + 1)
            .max()
            .unwrap_or(0)
    }
}

/// A lowered method
#[derive(Debug, Clone, PartialEq)]
pub struct IrMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    /// Parameters as typed operands
    pub params: Vec<Element>,
    pub return_type: IrType,
    pub instructions: Vec<Instruction>,
    /// Label name and the index of the instruction it precedes
    labels: Vec<(String, usize)>,
    pub var_table: VarTable,
}

impl IrMethod {
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            is_public: false,
            is_static: false,
            params: Vec::new(),
            return_type,
            instructions: Vec::new(),
            labels: Vec::new(),
            var_table: VarTable::new(),
        }
    }

    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Place a label before the next pushed instruction
    pub fn place_label(&mut self, label: impl Into<String>) {
        self.labels.push((label.into(), self.instructions.len()));
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = IrItem>) {
        for item in items {
            match item {
                IrItem::Label(label) => self.place_label(label),
                IrItem::Instr(instr) => self.push(instr),
            }
        }
    }

    pub fn labels(&self) -> &[(String, usize)] {
        &self.labels
    }

    /// Labels attached to instruction `index`; `index == len` gives trailing labels
    pub fn labels_at(&self, index: usize) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter(move |(_, at)| *at == index)
            .map(|(label, _)| label.as_str())
    }

    /// Index of the instruction a label precedes
    pub fn label_target(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, at)| *at)
    }
}
