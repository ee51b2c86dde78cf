use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jmm_engine::{Compiler, CompilerConfig, RawNode};
use serde_json::{json, Value};

fn node(kind: &str, attributes: Value, children: Vec<Value>) -> Value {
    json!({ "kind": kind, "attributes": attributes, "children": children })
}

fn ident(name: &str) -> Value {
    node("Identifier", json!({ "name": name }), vec![])
}

fn int(value: i32) -> Value {
    node("IntegerLiteral", json!({ "value": value.to_string() }), vec![])
}

fn int_ty() -> Value {
    node("Type", json!({ "name": "int" }), vec![])
}

fn binary(op: &str, lhs: Value, rhs: Value) -> Value {
    node("BinaryExpr", json!({ "op": op }), vec![lhs, rhs])
}

fn assign(name: &str, value: Value) -> Value {
    node("AssignStmt", json!({ "name": name }), vec![value])
}

/// `int sumN(int n) { int i; int s; i = 0; s = 0; while (i < n) { s = s + i * i; i = i + 1; } return s; }`
fn loop_method(index: usize) -> Value {
    node(
        "MethodDecl",
        json!({ "name": format!("sum{}", index), "isPublic": true }),
        vec![
            int_ty(),
            node("Param", json!({ "name": "n" }), vec![int_ty()]),
            node("VarDecl", json!({ "name": "i" }), vec![int_ty()]),
            node("VarDecl", json!({ "name": "s" }), vec![int_ty()]),
            assign("i", int(0)),
            assign("s", int(0)),
            node(
                "WhileStmt",
                json!({}),
                vec![
                    binary("<", ident("i"), ident("n")),
                    node(
                        "BlockStmt",
                        json!({}),
                        vec![
                            assign("s", binary("+", ident("s"), binary("*", ident("i"), ident("i")))),
                            assign("i", binary("+", ident("i"), int(1))),
                        ],
                    ),
                ],
            ),
            node("ReturnStmt", json!({}), vec![ident("s")]),
        ],
    )
}

fn program(methods: usize) -> String {
    let class = node(
        "ClassDecl",
        json!({ "name": "Bench" }),
        (0..methods).map(loop_method).collect(),
    );
    node("Program", json!({}), vec![class]).to_string()
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let compiler = Compiler::new(CompilerConfig::default());

    for methods in [1, 16, 128] {
        let source = program(methods);
        group.bench_with_input(BenchmarkId::new("json", methods), &source, |b, source| {
            b.iter(|| compiler.compile_json(black_box(source)).unwrap());
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let source = program(16);
    let ast = RawNode::from_json(&source).unwrap().to_program().unwrap();

    c.bench_function("analyze_16_methods", |b| {
        b.iter(|| jmm_engine::analyze(black_box(&ast)));
    });

    let mut config = CompilerConfig::default();
    config.codegen.emit_jasmin = false;
    let ollir_only = Compiler::new(config);
    c.bench_function("lower_16_methods", |b| {
        b.iter(|| ollir_only.compile(black_box(&ast)).unwrap());
    });
}

criterion_group!(benches, bench_compile, bench_stages);
criterion_main!(benches);
