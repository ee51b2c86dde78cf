//! IR classes

use super::method::IrMethod;
use super::value::IrType;

/// A class field
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub name: String,
    pub ty: IrType,
    pub is_private: bool,
}

impl IrField {
    pub fn access(&self) -> &'static str {
        if self.is_private {
            "private"
        } else {
            "public"
        }
    }
}

/// A lowered compilation unit: one class and its imports
#[derive(Debug, Clone, PartialEq)]
pub struct IrClass {
    /// Dot-joined import paths
    pub imports: Vec<String>,
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<IrField>,
    pub methods: Vec<IrMethod>,
}

impl IrClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            imports: Vec::new(),
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&IrField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// JVM class path for `name`, resolved through the imports
    pub fn class_path(&self, name: &str) -> String {
        if name == self.name {
            return name.to_string();
        }
        self.imports
            .iter()
            .find(|import| import.as_str() == name || import.rsplit('.').next() == Some(name))
            .map(|import| import.replace('.', "/"))
            .unwrap_or_else(|| name.to_string())
    }

    /// JVM class path of the superclass
    pub fn super_path(&self) -> String {
        match &self.superclass {
            Some(name) => self.class_path(name),
            None => "java/lang/Object".to_string(),
        }
    }
}
