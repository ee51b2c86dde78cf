//! Shared helpers for the integration suites
//!
//! Programs are written in the parser's JSON node format so every suite
//! exercises the same entry point as the command-line driver.

#![allow(dead_code)]

use jmm_engine::{CompileOutput, Compiler, CompilerConfig};
use serde_json::{json, Value};

pub fn node(kind: &str, attributes: Value, children: Vec<Value>) -> Value {
    json!({ "kind": kind, "attributes": attributes, "children": children })
}

pub fn at(mut node: Value, line: u32, column: u32) -> Value {
    node["line"] = json!(line);
    node["col"] = json!(column);
    node
}

// ----------------------------------------------------------------------------
// Types and declarations
// ----------------------------------------------------------------------------

pub fn ty(name: &str) -> Value {
    node("Type", json!({ "name": name }), vec![])
}

pub fn array_ty(name: &str) -> Value {
    node("Type", json!({ "name": name, "isArray": true }), vec![])
}

pub fn vararg_ty(name: &str) -> Value {
    node("Type", json!({ "name": name, "isVarArg": true }), vec![])
}

pub fn var(name: &str, ty: Value) -> Value {
    node("VarDecl", json!({ "name": name }), vec![ty])
}

pub fn param(name: &str, ty: Value) -> Value {
    node("Param", json!({ "name": name }), vec![ty])
}

pub fn method(name: &str, ret: Value, members: Vec<Value>) -> Value {
    let mut children = vec![ret];
    children.extend(members);
    node("MethodDecl", json!({ "name": name, "isPublic": true }), children)
}

pub fn main_method(members: Vec<Value>) -> Value {
    let mut children = vec![ty("void"), param("args", array_ty("String"))];
    children.extend(members);
    node(
        "MethodDecl",
        json!({ "name": "main", "isPublic": true, "isStatic": true }),
        children,
    )
}

pub fn class(name: &str, members: Vec<Value>) -> Value {
    node("ClassDecl", json!({ "name": name }), members)
}

pub fn import(path: &[&str]) -> Value {
    node("ImportStmt", json!({ "value": path }), vec![])
}

pub fn program(imports: Vec<Value>, class: Value) -> Value {
    let mut children = imports;
    children.push(class);
    node("Program", json!({}), children)
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

pub fn block(stmts: Vec<Value>) -> Value {
    node("BlockStmt", json!({}), stmts)
}

pub fn assign(name: &str, value: Value) -> Value {
    node("AssignStmt", json!({ "name": name }), vec![value])
}

pub fn assign_index(array: Value, index: Value, value: Value) -> Value {
    node(
        "AssignStmt",
        json!({}),
        vec![node("ArrayAccess", json!({}), vec![array, index]), value],
    )
}

pub fn expr_stmt(expr: Value) -> Value {
    node("ExprStmt", json!({}), vec![expr])
}

pub fn ret(value: Value) -> Value {
    node("ReturnStmt", json!({}), vec![value])
}

pub fn if_else(cond: Value, then: Vec<Value>, otherwise: Vec<Value>) -> Value {
    node("IfElseStmt", json!({}), vec![cond, block(then), block(otherwise)])
}

pub fn while_loop(cond: Value, body: Vec<Value>) -> Value {
    node("WhileStmt", json!({}), vec![cond, block(body)])
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

pub fn int(value: i32) -> Value {
    node("IntegerLiteral", json!({ "value": value.to_string() }), vec![])
}

pub fn boolean(value: bool) -> Value {
    node("BooleanLiteral", json!({ "value": value.to_string() }), vec![])
}

pub fn ident(name: &str) -> Value {
    node("Identifier", json!({ "name": name }), vec![])
}

pub fn this() -> Value {
    node("This", json!({}), vec![])
}

pub fn binary(op: &str, lhs: Value, rhs: Value) -> Value {
    node("BinaryExpr", json!({ "op": op }), vec![lhs, rhs])
}

pub fn not(operand: Value) -> Value {
    node("NegOperator", json!({}), vec![operand])
}

pub fn call(receiver: Value, name: &str, args: Vec<Value>) -> Value {
    let mut children = vec![receiver];
    children.extend(args);
    node("MethodCall", json!({ "name": name }), children)
}

pub fn new_object(name: &str) -> Value {
    node("NewObject", json!({ "name": name }), vec![])
}

pub fn new_int_array(size: Value) -> Value {
    node("NewArray", json!({}), vec![ty("int"), size])
}

pub fn length(array: Value) -> Value {
    node("Length", json!({}), vec![array])
}

pub fn index(array: Value, index: Value) -> Value {
    node("ArrayAccess", json!({}), vec![array, index])
}

// ----------------------------------------------------------------------------
// Driving the compiler
// ----------------------------------------------------------------------------

pub fn compile_with(program: &Value, config: CompilerConfig) -> CompileOutput {
    Compiler::new(config)
        .compile_json(&program.to_string())
        .expect("compilation failed")
}

pub fn compile(program: &Value) -> CompileOutput {
    compile_with(program, CompilerConfig::default())
}

/// Lines between a method's header and its closing line, each ending in `\n`
///
/// Works for both OLLIR (`}`) and Jasmin (`.end method`) text.
pub fn method_body(text: &str, name: &str) -> String {
    let mut lines = text.lines();
    lines
        .by_ref()
        .find(|line| line.starts_with(".method") && line.contains(&format!(" {}(", name)))
        .unwrap_or_else(|| panic!("method {} not found in:\n{}", name, text));
    lines
        .take_while(|line| *line != "}" && *line != ".end method")
        .map(|line| format!("{}\n", line))
        .collect()
}
