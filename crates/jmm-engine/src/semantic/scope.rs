//! Scope registry
//!
//! A flat catalogue of every declared variable in the unit, tagged with its
//! owning method. Identifier lookup gives a local or parameter of the current
//! method precedence over a field of the same name.
//!
//! The builder also validates vararg placement:
//! - a vararg parameter must be the last parameter of its method
//! - a return type must not be a vararg
//! - locals and fields must not be varargs (such entries are not registered)

use super::error::CheckError;
use super::symbols::SymbolTable;
use super::types::Type;
use crate::ast::{ClassDecl, MethodDecl, Program};

/// Where a variable was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Field,
    Parameter,
    Local,
}

/// One declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub name: String,
    pub kind: ScopeKind,

    /// Owning method; `None` for fields
    pub method: Option<String>,

    pub ty: Type,
    pub is_vararg: bool,
}

impl ScopeEntry {
    fn owned_by(&self, method: &str) -> bool {
        self.method.as_deref() == Some(method)
    }
}

/// Every variable declared in one compilation unit
///
/// Built in full before any lookup and immutable afterward.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    entries: Vec<ScopeEntry>,
}

impl ScopeRegistry {
    /// Build the registry, returning it together with vararg placement errors
    pub fn build(table: &SymbolTable, program: &Program) -> (Self, Vec<CheckError>) {
        let mut builder = RegistryBuilder {
            table,
            entries: Vec::new(),
            errors: Vec::new(),
        };
        for class in &program.classes {
            builder.visit_class(class);
        }
        tracing::debug!(
            entries = builder.entries.len(),
            errors = builder.errors.len(),
            "built scope registry"
        );
        (
            Self {
                entries: builder.entries,
            },
            builder.errors,
        )
    }

    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    /// Resolve `name` as seen from inside `method`
    ///
    /// A parameter or local owned by `method` wins over a field; among
    /// entries of the same precedence the last declared one wins.
    pub fn lookup(&self, name: &str, method: &str) -> Option<&ScopeEntry> {
        let mut field = None;
        let mut owned = None;
        for entry in self.entries.iter().filter(|entry| entry.name == name) {
            match entry.kind {
                ScopeKind::Field => field = Some(entry),
                ScopeKind::Parameter | ScopeKind::Local if entry.owned_by(method) => {
                    owned = Some(entry)
                }
                _ => {}
            }
        }
        owned.or(field)
    }

    /// True if `name` inside `method` is bound to a vararg parameter
    pub fn is_vararg(&self, name: &str, method: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == name && entry.owned_by(method) && entry.is_vararg)
    }

    /// True if `name` inside `method` resolves to a field
    pub fn resolves_to_field(&self, name: &str, method: &str) -> bool {
        self.lookup(name, method)
            .is_some_and(|entry| entry.kind == ScopeKind::Field)
    }
}

struct RegistryBuilder<'a> {
    table: &'a SymbolTable,
    entries: Vec<ScopeEntry>,
    errors: Vec<CheckError>,
}

impl RegistryBuilder<'_> {
    fn visit_class(&mut self, class: &ClassDecl) {
        for field in &class.fields {
            if field.ty.is_vararg {
                self.errors.push(CheckError::VarargField {
                    name: field.name.clone(),
                    span: field.span,
                });
                continue;
            }
            if let Some(symbol) = self.table.field(&field.name) {
                self.entries.push(ScopeEntry {
                    name: symbol.name.clone(),
                    kind: ScopeKind::Field,
                    method: None,
                    ty: symbol.ty.clone(),
                    is_vararg: false,
                });
            }
        }

        for method in &class.methods {
            let valid = self.validate_signature(method);
            self.register_method(method, valid);
        }
    }

    /// Report vararg misuse in a method's signature
    ///
    /// A vararg parameter that is not last ends validation of the method;
    /// returns false in that case.
    fn validate_signature(&mut self, method: &MethodDecl) -> bool {
        let last = method.params.len().saturating_sub(1);
        if let Some((_, param)) = method
            .params
            .iter()
            .enumerate()
            .find(|(i, param)| param.ty.is_vararg && *i != last)
        {
            self.errors.push(CheckError::VarargNotLast {
                method: method.name.clone(),
                param: param.name.clone(),
                span: method.span,
            });
            return false;
        }

        if method.return_type.is_vararg {
            self.errors.push(CheckError::VarargReturnType {
                method: method.name.clone(),
                span: method.span,
            });
        }
        true
    }

    /// Register parameters and locals; vararg locals are reported only when
    /// `validate_locals` is set and are never registered
    fn register_method(&mut self, method: &MethodDecl, validate_locals: bool) {
        let Some(signature) = self.table.method(&method.name) else {
            return;
        };

        for param in &signature.params {
            self.entries.push(ScopeEntry {
                name: param.name.clone(),
                kind: ScopeKind::Parameter,
                method: Some(method.name.clone()),
                ty: param.ty.clone(),
                is_vararg: param.is_vararg,
            });
        }

        for (decl, local) in method.locals.iter().zip(&signature.locals) {
            if local.is_vararg {
                if validate_locals {
                    self.errors.push(CheckError::VarargLocal {
                        method: method.name.clone(),
                        name: local.name.clone(),
                        span: decl.span,
                    });
                }
                continue;
            }
            self.entries.push(ScopeEntry {
                name: local.name.clone(),
                kind: ScopeKind::Local,
                method: Some(method.name.clone()),
                ty: local.ty.clone(),
                is_vararg: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::TypeAnnotation;

    fn registry(program: &Program) -> (ScopeRegistry, Vec<CheckError>) {
        let table = SymbolTable::build(program).unwrap();
        ScopeRegistry::build(&table, program)
    }

    #[test]
    fn test_local_shadows_field_only_in_owner() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .field("x", int_ty())
                .method(MethodBuilder::new("m").local("x", bool_ty()).build())
                .method(MethodBuilder::new("n").build())
                .build(),
        );
        let (scopes, errors) = registry(&program);
        assert!(errors.is_empty());
        assert_eq!(scopes.lookup("x", "m").unwrap().ty, Type::boolean());
        assert_eq!(scopes.lookup("x", "n").unwrap().ty, Type::int());
        assert!(!scopes.resolves_to_field("x", "m"));
        assert!(scopes.resolves_to_field("x", "n"));
        assert!(scopes.lookup("y", "m").is_none());
    }

    #[test]
    fn test_vararg_parameter_registered() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .method(
                    MethodBuilder::new("f")
                        .param("v", TypeAnnotation::vararg("int"))
                        .build(),
                )
                .build(),
        );
        let (scopes, errors) = registry(&program);
        assert!(errors.is_empty());
        assert!(scopes.is_vararg("v", "f"));
        assert!(!scopes.is_vararg("v", "g"));
        assert_eq!(scopes.lookup("v", "f").unwrap().kind, ScopeKind::Parameter);
    }

    #[test]
    fn test_vararg_not_last_is_reported() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .method(
                    MethodBuilder::new("f")
                        .param("v", TypeAnnotation::vararg("int"))
                        .param("w", int_ty())
                        .build(),
                )
                .build(),
        );
        let (_, errors) = registry(&program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CheckError::VarargNotLast { param, .. } if param == "v"));
    }

    #[test]
    fn test_vararg_not_last_ends_method_validation() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .method(
                    MethodBuilder::new("f")
                        .returns(TypeAnnotation::vararg("int"))
                        .param("v", TypeAnnotation::vararg("int"))
                        .param("w", int_ty())
                        .local("l", TypeAnnotation::vararg("int"))
                        .local("k", int_ty())
                        .build(),
                )
                .method(
                    MethodBuilder::new("g")
                        .local("m", TypeAnnotation::vararg("int"))
                        .build(),
                )
                .build(),
        );
        let (scopes, errors) = registry(&program);
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], CheckError::VarargNotLast { method, .. } if method == "f"));
        assert!(matches!(&errors[1], CheckError::VarargLocal { method, .. } if method == "g"));
        assert_eq!(scopes.lookup("w", "f").unwrap().kind, ScopeKind::Parameter);
        assert_eq!(scopes.lookup("k", "f").unwrap().kind, ScopeKind::Local);
        assert!(scopes.lookup("l", "f").is_none());
    }

    #[test]
    fn test_vararg_return_local_and_field_rejected() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .field("f", TypeAnnotation::vararg("int"))
                .method(
                    MethodBuilder::new("m")
                        .returns(TypeAnnotation::vararg("int"))
                        .local("l", TypeAnnotation::vararg("int"))
                        .build(),
                )
                .build(),
        );
        let (scopes, errors) = registry(&program);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], CheckError::VarargField { .. }));
        assert!(matches!(errors[1], CheckError::VarargReturnType { .. }));
        assert!(matches!(errors[2], CheckError::VarargLocal { .. }));
        assert!(scopes.lookup("f", "m").is_none());
        assert!(scopes.lookup("l", "m").is_none());
    }
}
