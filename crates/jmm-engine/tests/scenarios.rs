//! End-to-end scenarios: JSON tree in, OLLIR and Jasmin out
//!
//! Run with: cargo test -p jmm-engine --test scenarios

mod common;

use common::*;

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, text))
}

#[test]
fn test_if_else_places_else_branch_first() {
    let source = program(
        vec![],
        class(
            "Choice",
            vec![method(
                "pick",
                ty("int"),
                vec![
                    param("a", ty("int")),
                    param("b", ty("int")),
                    var("r", ty("int")),
                    if_else(
                        binary("<", ident("a"), ident("b")),
                        vec![assign("r", int(1))],
                        vec![assign("r", int(0))],
                    ),
                    ret(ident("r")),
                ],
            )],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ollir = method_body(output.ollir.as_deref().unwrap(), "pick");
    let else_assign = position(&ollir, "r.i32 :=.i32 0.i32;");
    let body_label = position(&ollir, "ifbody_0:");
    let then_assign = position(&ollir, "r.i32 :=.i32 1.i32;");
    let end_label = position(&ollir, "endif_0:");
    assert!(else_assign < body_label);
    assert!(body_label < then_assign);
    assert!(then_assign < end_label);
    assert_eq!(ollir.matches("endif_0:").count(), 1);
    assert_eq!(ollir.matches("goto endif_0;").count(), 1);

    let jasmin = method_body(output.jasmin.as_deref().unwrap(), "pick");
    assert!(jasmin.starts_with("   .limit stack 2\n   .limit locals 4\n"));
    assert!(jasmin.contains("   iload_1\n   iload_2\n   if_icmplt ifbody_0\n"));
    assert!(jasmin.contains("ifbody_0:\n   iconst_1\n   istore_3\n"));
    assert!(jasmin.ends_with("endif_0:\n   iload_3\n   ireturn\n"));
}

#[test]
fn test_while_condition_is_computed_once() {
    let source = program(
        vec![],
        class(
            "Counter",
            vec![
                method("limit", ty("int"), vec![ret(int(10))]),
                method(
                    "count",
                    ty("int"),
                    vec![
                        var("i", ty("int")),
                        assign("i", int(0)),
                        while_loop(
                            binary("<", ident("i"), call(this(), "limit", vec![])),
                            vec![assign("i", binary("+", ident("i"), int(1)))],
                        ),
                        ret(ident("i")),
                    ],
                ),
            ],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ollir = method_body(output.ollir.as_deref().unwrap(), "count");
    assert_eq!(
        ollir,
        "i.i32 :=.i32 0.i32;\n\
         tmp0.i32 :=.i32 invokevirtual(this, \"limit\").i32;\n\
         if (i.i32 <.bool tmp0.i32) goto whilebody_0;\n\
         goto endwhile_0;\n\
         whilebody_0:\n\
         i.i32 :=.i32 i.i32 +.i32 1.i32;\n\
         if (i.i32 <.bool tmp0.i32) goto whilebody_0;\n\
         endwhile_0:\n\
         ret.i32 i.i32;\n"
    );

    let jasmin = method_body(output.jasmin.as_deref().unwrap(), "count");
    assert_eq!(jasmin.matches("invokevirtual Counter/limit()I").count(), 1);
    assert!(jasmin.contains("whilebody_0:\n   iinc 1 1\n"));
    assert_eq!(jasmin.matches("if_icmplt whilebody_0").count(), 2);
}

#[test]
fn test_vararg_call_packs_arguments() {
    let source = program(
        vec![],
        class(
            "Sum",
            vec![
                method(
                    "foo",
                    ty("int"),
                    vec![param("v", vararg_ty("int")), ret(length(ident("v")))],
                ),
                method(
                    "run",
                    ty("int"),
                    vec![ret(call(this(), "foo", vec![int(1), int(2), int(3)]))],
                ),
            ],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ollir = method_body(output.ollir.as_deref().unwrap(), "run");
    assert_eq!(
        ollir,
        "tmp1.array.i32 :=.array.i32 new(array, 3.i32).array.i32;\n\
         __varargs_array_0.array.i32 :=.array.i32 tmp1.array.i32;\n\
         __varargs_array_0.array.i32[0.i32].i32 :=.i32 1.i32;\n\
         __varargs_array_0.array.i32[1.i32].i32 :=.i32 2.i32;\n\
         __varargs_array_0.array.i32[2.i32].i32 :=.i32 3.i32;\n\
         tmp2.i32 :=.i32 invokevirtual(this, \"foo\", __varargs_array_0.array.i32).i32;\n\
         ret.i32 tmp2.i32;\n"
    );

    let jasmin = output.jasmin.unwrap();
    assert!(jasmin.contains(".method public foo([I)I\n"));
    let run = method_body(&jasmin, "run");
    assert!(run.contains("   iconst_3\n   newarray int\n   astore_1\n"));
    assert!(run.contains("   aload_2\n   iconst_2\n   iconst_3\n   iastore\n"));
    assert!(run.contains("   aload_0\n   aload_2\n   invokevirtual Sum/foo([I)I\n"));
}

#[test]
fn test_static_main_with_imports_and_objects() {
    let source = program(
        vec![import(&["io"])],
        class(
            "Main",
            vec![
                var("total", ty("int")),
                method(
                    "add",
                    ty("int"),
                    vec![
                        param("x", ty("int")),
                        assign("total", binary("+", ident("total"), ident("x"))),
                        ret(ident("total")),
                    ],
                ),
                main_method(vec![
                    var("m", ty("Main")),
                    assign("m", new_object("Main")),
                    expr_stmt(call(ident("m"), "add", vec![int(40)])),
                    expr_stmt(call(
                        ident("io"),
                        "println",
                        vec![call(ident("m"), "add", vec![int(2)])],
                    )),
                ]),
            ],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ollir = output.ollir.unwrap();
    assert!(ollir.starts_with("import io;\nMain {\n\n.field public total.i32;\n"));
    assert!(ollir.contains(".method public static main(args.array.String).V {\n"));
    assert!(ollir.contains("invokestatic(io, \"println\", tmp"));
    assert!(ollir.ends_with(".construct Main().V {\ninvokespecial(this, \"<init>\").V;\n}\n}\n"));

    let jasmin = output.jasmin.unwrap();
    assert!(jasmin.starts_with(".class public Main\n.super java/lang/Object\n\n.field public total I\n"));
    let main = method_body(&jasmin, "main");
    assert!(main.contains("   new Main\n"));
    assert!(main.contains("   invokespecial Main/<init>()V\n"));
    assert!(main.contains("   invokevirtual Main/add(I)I\n   pop\n"));
    assert!(main.contains("   invokestatic io/println(I)V\n"));
    assert!(main.ends_with("   return\n"));

    let add = method_body(&jasmin, "add");
    assert!(add.contains("   getfield Main/total I\n"));
    assert!(add.contains("   putfield Main/total I\n"));
}

#[test]
fn test_imported_call_result_passed_to_library() {
    let source = program(
        vec![import(&["io"]), import(&["Lib"])],
        class(
            "Main",
            vec![method(
                "m",
                ty("void"),
                vec![
                    var("lib", ty("Lib")),
                    assign("lib", new_object("Lib")),
                    expr_stmt(call(
                        ident("io"),
                        "println",
                        vec![call(ident("lib"), "get", vec![])],
                    )),
                ],
            )],
        ),
    );
    let output = compile(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let ollir = method_body(output.ollir.as_deref().unwrap(), "m");
    assert!(ollir.contains("tmp1.i32 :=.i32 invokevirtual(lib.Lib, \"get\").i32;\n"));
    assert!(ollir.contains("invokestatic(io, \"println\", tmp1.i32).V;\n"));

    let m = method_body(output.jasmin.as_deref().unwrap(), "m");
    assert!(m.contains("   invokevirtual Lib/get()I\n"));
    assert!(m.contains("   invokestatic io/println(I)V\n"));
    assert!(m.ends_with("   return\n"));
}
