//! Semantic analysis through the JSON entry point
//!
//! Run with: cargo test -p jmm-engine --test semantic

mod common;

use common::*;
use jmm_engine::semantic::Severity;
use jmm_engine::{CompileError, Compiler};
use serde_json::Value;

fn with_method(members: Vec<Value>) -> Value {
    program(
        vec![import(&["io"])],
        class(
            "Check",
            vec![
                var("x", ty("int")),
                method(
                    "sum",
                    ty("int"),
                    vec![param("v", vararg_ty("int")), ret(int(0))],
                ),
                method("run", ty("void"), members),
            ],
        ),
    )
}

#[test]
fn test_local_shadows_field_only_in_its_method() {
    // `x` is a boolean local in `run` and the int field elsewhere
    let source = program(
        vec![],
        class(
            "Shadow",
            vec![
                var("x", ty("int")),
                method(
                    "run",
                    ty("boolean"),
                    vec![var("x", ty("boolean")), assign("x", boolean(true)), ret(ident("x"))],
                ),
                method("other", ty("int"), vec![ret(ident("x"))]),
            ],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let ollir = output.ollir.unwrap();
    assert!(method_body(&ollir, "run").contains("x.bool :=.bool 1.bool;"));
    assert!(method_body(&ollir, "other").contains("getfield(this, x.i32).i32"));
}

#[test]
fn test_vararg_calls() {
    let accepted = with_method(vec![
        expr_stmt(call(this(), "sum", vec![])),
        expr_stmt(call(this(), "sum", vec![int(1), int(2)])),
        expr_stmt(call(this(), "sum", vec![new_int_array(int(4))])),
    ]);
    assert!(compile(&accepted).diagnostics.is_empty());

    let mixed = with_method(vec![expr_stmt(call(
        this(),
        "sum",
        vec![int(1), boolean(true)],
    ))]);
    let output = compile(&mixed);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].code.as_deref(), Some("E2008"));
    assert_eq!(output.ollir, None);
}

#[test]
fn test_diagnostics_carry_positions_and_order() {
    let source = with_method(vec![
        at(
            while_loop(int(1), vec![]),
            4,
            9,
        ),
        at(assign("x", boolean(false)), 5, 9),
        at(expr_stmt(call(this(), "missing", vec![])), 6, 9),
    ]);
    let output = compile(&source);
    let reports: Vec<(u32, u32, Option<&str>)> = output
        .diagnostics
        .iter()
        .map(|d| (d.line, d.column, d.code.as_deref()))
        .collect();
    assert_eq!(
        reports,
        vec![
            (4, 9, Some("E2001")),
            (5, 9, Some("E2002")),
            (0, 0, Some("E2007")),
        ]
    );
    assert!(output.diagnostics.iter().all(|d| d.severity == Severity::Error));
    assert!(output.diagnostics[0].message.contains("While condition"));
}

#[test]
fn test_imported_receivers_are_not_checked() {
    let source = with_method(vec![
        expr_stmt(call(ident("io"), "println", vec![boolean(true), int(3)])),
        expr_stmt(call(ident("io"), "println", vec![call(this(), "sum", vec![int(1)])])),
    ]);
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_diagnostics_serialize_as_json() {
    let source = with_method(vec![at(ret(int(1)), 3, 5)]);
    let output = compile(&source);
    let json = jmm_engine::semantic::diagnostic::to_json_array(&output.diagnostics).unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["severity"], "error");
    assert_eq!(parsed[0]["stage"], "SEMANTIC");
    assert_eq!(parsed[0]["line"], 3);
    assert_eq!(parsed[0]["column"], 5);
    assert_eq!(parsed[0]["code"], "E2005");
}

#[test]
fn test_two_classes_are_fatal() {
    let mut source = program(vec![], class("A", vec![]));
    source["children"]
        .as_array_mut()
        .unwrap()
        .push(class("B", vec![]));
    let result = Compiler::default().compile_json(&source.to_string());
    assert!(matches!(result, Err(CompileError::ClassCount { found: 2 })));
}
