//! Compilation driver
//!
//! Runs one unit through every stage in order. Each stage receives the
//! completed output of the previous one, and all per-compilation state
//! lives in a [`CompilationContext`] created here.

use crate::ast::{Program, RawNode};
use crate::compiler::{self, CompilationContext, IrClass, PrettyPrint};
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use crate::semantic::{self, Diagnostic};

/// Products of one compilation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOutput {
    /// Semantic diagnostics, in report order
    pub diagnostics: Vec<Diagnostic>,
    /// OLLIR text, when lowering ran and `emit_ollir` is set
    pub ollir: Option<String>,
    /// Jasmin text, when lowering ran and `emit_jasmin` is set
    pub jasmin: Option<String>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Jmm compiler
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a program
    ///
    /// Semantic errors are returned as diagnostics; lowering only runs when
    /// there are none, or when `check.continue_on_error` is set. Fatal
    /// problems (malformed class count, IR without an emission rule) are
    /// returned as errors.
    pub fn compile(&self, program: &Program) -> CompileResult<CompileOutput> {
        let analysis = semantic::analyze(program)?;
        let mut output = CompileOutput {
            diagnostics: analysis.diagnostics(),
            ..CompileOutput::default()
        };

        if analysis.has_errors() && !self.config.check.continue_on_error {
            tracing::debug!(errors = output.diagnostics.len(), "stopping after semantic analysis");
            return Ok(output);
        }

        let mut ctx = CompilationContext::new();
        let class = compiler::lower_program(&analysis, program, &mut ctx)?;
        let codegen = &self.config.codegen;
        if codegen.emit_ollir {
            output.ollir = Some(class.pretty_print());
        }
        if codegen.emit_jasmin {
            output.jasmin = Some(self.emit_jasmin(class)?);
        }
        Ok(output)
    }

    /// Compile the JSON form of a parsed tree
    pub fn compile_json(&self, json: &str) -> CompileResult<CompileOutput> {
        let program = RawNode::from_json(json)?.to_program()?;
        self.compile(&program)
    }

    /// Generate Jasmin for an IR class
    ///
    /// Methods without a variable table get the default one.
    pub fn emit_jasmin(&self, mut class: IrClass) -> CompileResult<String> {
        compiler::assign_slots(&mut class);
        compiler::generate(&class, &self.config.codegen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::error::CompileError;

    fn broken() -> Program {
        program(
            &[],
            ClassBuilder::new("A")
                .method(
                    MethodBuilder::new("f")
                        .returns(int_ty())
                        .stmt(ret(boolean(true)))
                        .build(),
                )
                .build(),
        )
    }

    #[test]
    fn test_errors_stop_before_lowering() {
        let output = Compiler::default().compile(&broken()).unwrap();
        assert!(output.has_errors());
        assert_eq!(output.ollir, None);
        assert_eq!(output.jasmin, None);
    }

    #[test]
    fn test_continue_on_error_still_lowers() {
        let mut config = CompilerConfig::default();
        config.check.continue_on_error = true;
        config.codegen.emit_jasmin = false;
        let output = Compiler::new(config).compile(&broken()).unwrap();
        assert!(output.has_errors());
        assert!(output.ollir.is_some_and(|text| text.contains("ret.i32 1.bool;")));
        assert_eq!(output.jasmin, None);
    }

    #[test]
    fn test_clean_program_produces_both_outputs() {
        let program = program(
            &[],
            ClassBuilder::new("A")
                .method(
                    MethodBuilder::new("f")
                        .returns(int_ty())
                        .stmt(ret(add(int(1), int(2))))
                        .build(),
                )
                .build(),
        );
        let output = Compiler::default().compile(&program).unwrap();
        assert!(output.diagnostics.is_empty());
        assert!(output.ollir.unwrap().contains("tmp0.i32 :=.i32 1.i32 +.i32 2.i32;"));
        let jasmin = output.jasmin.unwrap();
        assert!(jasmin.contains(".method public f()I"));
        assert!(jasmin.contains("   iconst_1\n   iconst_2\n   iadd\n   istore_1\n"));
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        let result = Compiler::default().compile_json("{ not json");
        assert!(matches!(result, Err(CompileError::Json(_))));
    }
}
