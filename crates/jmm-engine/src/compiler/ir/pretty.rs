//! OLLIR text output
//!
//! Renders IR in the textual three-address form consumed by external tools:
//! one instruction per line terminated by `;`, labels on their own line.

use super::method::IrMethod;
use super::module::IrClass;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for IrClass {
    fn pretty_print(&self) -> String {
        let mut output = String::new();

        for import in &self.imports {
            output.push_str(&format!("import {};\n", import));
        }

        output.push_str(&self.name);
        if let Some(superclass) = &self.superclass {
            output.push_str(&format!(" extends {}", superclass));
        }
        output.push_str(" {\n\n");

        for field in &self.fields {
            output.push_str(&format!(".field {} {}.{};\n", field.access(), field.name, field.ty));
        }
        if !self.methods.is_empty() {
            output.push('\n');
        }

        for method in &self.methods {
            output.push_str(&method.pretty_print());
            output.push('\n');
        }

        // Default constructor
        output.push_str(&format!(".construct {}().V {{\n", self.name));
        output.push_str("invokespecial(this, \"<init>\").V;\n");
        output.push_str("}\n");
        output.push_str("}\n");
        output
    }
}

impl PrettyPrint for IrMethod {
    fn pretty_print(&self) -> String {
        let mut output = String::from(".method ");
        if self.is_public {
            output.push_str("public ");
        }
        if self.is_static {
            output.push_str("static ");
        }

        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        output.push_str(&format!(
            "{}({}).{} {{\n",
            self.name,
            params.join(", "),
            self.return_type
        ));

        for (index, instr) in self.instructions.iter().enumerate() {
            for label in self.labels_at(index) {
                output.push_str(&format!("{}:\n", label));
            }
            output.push_str(&format!("{};\n", instr));
        }
        for label in self.labels_at(self.instructions.len()) {
            output.push_str(&format!("{}:\n", label));
        }

        output.push_str("}\n");
        output
    }
}
