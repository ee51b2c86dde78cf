//! Class-level symbol table
//!
//! Holds the static facts of the single class in a compilation unit:
//! its name, superclass, imports, fields, and method signatures.
//! Built once from the AST and read-only afterward.

use super::types::Type;
use crate::ast::{MethodDecl, Param, Program, VarDecl};
use crate::error::{CompileError, CompileResult};
use rustc_hash::FxHashMap;

/// A declared field, parameter, or local variable
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Declared name
    pub name: String,

    /// Declared type (`int` for `int...`)
    pub ty: Type,

    /// Declared with `...`
    pub is_vararg: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_vararg: false,
        }
    }

    /// Vararg symbol of element type `ty`
    pub fn vararg(name: impl Into<String>, ty: Type) -> Self {
        Self {
            is_vararg: true,
            ..Self::new(name, ty)
        }
    }

    fn from_var(decl: &VarDecl) -> Self {
        Self {
            name: decl.name.clone(),
            ty: Type::from_annotation(&decl.ty),
            is_vararg: decl.ty.is_vararg,
        }
    }

    fn from_param(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            ty: Type::from_annotation(&param.ty),
            is_vararg: param.ty.is_vararg,
        }
    }
}

/// Signature and locals of one method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,

    /// Declared return type
    pub return_type: Type,

    pub is_static: bool,
    pub is_public: bool,

    /// Formal parameters, in declaration order
    pub params: Vec<Symbol>,

    /// Local variables, in declaration order
    pub locals: Vec<Symbol>,
}

impl MethodSignature {
    fn from_decl(decl: &MethodDecl) -> Self {
        Self {
            name: decl.name.clone(),
            return_type: Type::from_annotation(&decl.return_type),
            is_static: decl.is_static,
            is_public: decl.is_public,
            params: decl.params.iter().map(Symbol::from_param).collect(),
            locals: decl.locals.iter().map(Symbol::from_var).collect(),
        }
    }

    /// True if the method takes exactly one parameter and it is a vararg
    pub fn is_single_vararg(&self) -> bool {
        matches!(self.params.as_slice(), [only] if only.is_vararg)
    }
}

/// Static facts about the compiled class
#[derive(Debug, Clone)]
pub struct SymbolTable {
    class_name: String,
    superclass: Option<String>,

    /// Dot-joined import paths, in source order
    imports: Vec<String>,

    fields: Vec<Symbol>,
    private_fields: Vec<String>,

    /// Methods in declaration order
    methods: Vec<MethodSignature>,
    method_index: FxHashMap<String, usize>,
}

impl SymbolTable {
    /// Build the table from a program
    ///
    /// Fails unless the program declares exactly one class.
    pub fn build(program: &Program) -> CompileResult<Self> {
        let class = match program.classes.as_slice() {
            [class] => class,
            classes => {
                return Err(CompileError::ClassCount {
                    found: classes.len(),
                })
            }
        };

        let methods: Vec<MethodSignature> =
            class.methods.iter().map(MethodSignature::from_decl).collect();
        let method_index = methods
            .iter()
            .enumerate()
            .map(|(index, method)| (method.name.clone(), index))
            .collect();

        let table = Self {
            class_name: class.name.clone(),
            superclass: class.extends.clone(),
            imports: program.imports.iter().map(|import| import.dotted()).collect(),
            fields: class.fields.iter().map(Symbol::from_var).collect(),
            private_fields: class
                .fields
                .iter()
                .filter(|field| field.is_private)
                .map(|field| field.name.clone())
                .collect(),
            methods,
            method_index,
        };

        tracing::debug!(
            class = %table.class_name,
            methods = table.methods.len(),
            fields = table.fields.len(),
            imports = table.imports.len(),
            "built symbol table"
        );
        Ok(table)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Superclass from the `extends` clause
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn fields(&self) -> &[Symbol] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn is_private_field(&self, name: &str) -> bool {
        self.private_fields.iter().any(|field| field == name)
    }

    /// Methods in declaration order
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|method| method.name.as_str())
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.method_index.get(name).map(|&index| &self.methods[index])
    }

    pub fn return_type(&self, method: &str) -> Option<&Type> {
        self.method(method).map(|sig| &sig.return_type)
    }

    pub fn parameters(&self, method: &str) -> Option<&[Symbol]> {
        self.method(method).map(|sig| sig.params.as_slice())
    }

    pub fn locals(&self, method: &str) -> Option<&[Symbol]> {
        self.method(method).map(|sig| sig.locals.as_slice())
    }

    /// True if `name` is an import: the full dotted path or its last segment
    pub fn is_import(&self, name: &str) -> bool {
        self.imports
            .iter()
            .any(|import| import == name || import.rsplit('.').next() == Some(name))
    }

    /// JVM class path for a class name (`a/b/C` for an import of `a.b.C`)
    pub fn qualified_name(&self, name: &str) -> String {
        if name == self.class_name {
            return name.to_string();
        }
        self.imports
            .iter()
            .find(|import| import.rsplit('.').next() == Some(name))
            .map(|import| import.replace('.', "/"))
            .unwrap_or_else(|| name.to_string())
    }

    /// JVM class path of the superclass, `java/lang/Object` when absent
    pub fn super_path(&self) -> String {
        match &self.superclass {
            Some(name) => self.qualified_name(name),
            None => "java/lang/Object".to_string(),
        }
    }
}
