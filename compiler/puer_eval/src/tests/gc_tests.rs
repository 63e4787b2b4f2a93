use pretty_assertions::assert_eq;
use puer_ir::build::{
    array_lit, assign, binary, block, call, compound_assign, field, field_decl, for_loop, func_def,
    increment, index, int, println, record_decl, record_def, return_stmt, seq, string, var,
    var_decl,
};
use puer_ir::{BinaryOp, Node, TypeTag};
use puer_value::{GcConfig, GcPhase};

use crate::{buffer_handler, Interpreter, SharedPrintHandler};

fn interpreter<'a>(gc: GcConfig) -> (Interpreter<'a>, SharedPrintHandler) {
    let output = buffer_handler();
    let interp = Interpreter::builder()
        .gc_config(gc)
        .print_handler(output.clone())
        .build();
    (interp, output)
}

fn fine_grained() -> GcConfig {
    GcConfig {
        sweep_slice: 1,
        step_per_statement: true,
    }
}

/// `for (int i = 0; i < n; i++) { body }`
fn repeat(n: i32, body: Vec<Node>) -> Node {
    for_loop(
        var_decl("i", TypeTag::Int, Some(int(0))),
        binary(BinaryOp::Lt, var("i"), int(n)),
        increment(var("i")),
        block(body),
    )
}

#[test]
fn overwritten_values_are_reclaimed() {
    let program = seq(vec![
        var_decl("s", TypeTag::Str, Some(string(""))),
        repeat(50, vec![assign(var("s"), string("x"))]),
    ]);
    let (mut interp, _) = interpreter(GcConfig::default());
    assert!(interp.run(&program).is_ok());

    interp.collect_garbage();
    // The global scope and the string bound to `s`.
    assert_eq!(interp.heap().live_count(), 2);
    assert!(interp.heap().stats().freed >= 50);
}

#[test]
fn reachable_values_survive_incremental_collection() {
    let program = seq(vec![
        var_decl("s", TypeTag::Str, Some(string(""))),
        repeat(
            200,
            vec![compound_assign(BinaryOp::Add, var("s"), string("ab"))],
        ),
        println(Some(call("len", vec![var("s")]))),
        println(Some(index(var("s"), int(399)))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "400\n98\n");
    assert!(interp.heap().stats().cycles > 0);
}

#[test]
fn array_items_survive_collection() {
    let program = seq(vec![
        var_decl(
            "names",
            TypeTag::Array,
            Some(array_lit(vec![string("a"), string("b")])),
        ),
        repeat(
            50,
            vec![call("append", vec![var("names"), string("c")])],
        ),
        call("gc_collect", vec![]),
        println(Some(call("len", vec![var("names")]))),
        println(Some(index(var("names"), int(51)))),
        println(Some(index(var("names"), int(0)))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "52\nc\na\n");
}

#[test]
fn record_defaults_stay_alive() {
    let program = seq(vec![
        record_def(
            "Named",
            vec![field_decl("label", TypeTag::Str, Some(string("default")))],
        ),
        repeat(30, vec![var_decl("t", TypeTag::Str, Some(string("garbage")))]),
        call("gc_collect", vec![]),
        record_decl("n", "Named", None),
        println(Some(var("n"))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "Named { label: default }\n");
}

#[test]
fn temporaries_survive_a_collection_inside_a_call() {
    // The left operand is held while the call on the right runs statements
    // and forces a full collection.
    let program = seq(vec![
        func_def(
            "churn",
            vec![],
            TypeTag::Str,
            block(vec![
                call("gc_collect", vec![]),
                return_stmt(Some(string("!"))),
            ]),
        ),
        println(Some(binary(
            BinaryOp::Add,
            binary(BinaryOp::Add, string("left"), string("-")),
            call("churn", vec![]),
        ))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "left-!\n");
}

/// `name() { target = replacement; gc_collect(); return result; }`
fn rebind_and_collect(
    name: &str,
    target: Node,
    replacement: Node,
    ret: TypeTag,
    result: Node,
) -> Node {
    func_def(
        name,
        vec![],
        ret,
        block(vec![
            assign(target, replacement),
            call("gc_collect", vec![]),
            return_stmt(Some(result)),
        ]),
    )
}

#[test]
fn compound_assignment_holds_the_old_value_across_a_collecting_call() {
    let program = seq(vec![
        var_decl("s", TypeTag::Str, Some(string("aa"))),
        rebind_and_collect("f", var("s"), string("zz"), TypeTag::Str, string("b")),
        compound_assign(BinaryOp::Add, var("s"), call("f", vec![])),
        println(Some(var("s"))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "aab\n");
}

#[test]
fn indexed_compound_assignment_holds_the_container_and_element() {
    let program = seq(vec![
        var_decl(
            "words",
            TypeTag::Array,
            Some(array_lit(vec![string("a")])),
        ),
        rebind_and_collect(
            "swap",
            var("words"),
            array_lit(vec![string("z")]),
            TypeTag::Str,
            string("b"),
        ),
        println(Some(compound_assign(
            BinaryOp::Add,
            index(var("words"), int(0)),
            call("swap", vec![]),
        ))),
        println(Some(var("words"))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "ab\n[z]\n");
}

#[test]
fn field_compound_assignment_holds_the_old_field_value() {
    let program = seq(vec![
        record_def(
            "Named",
            vec![field_decl("label", TypeTag::Str, Some(string("ab")))],
        ),
        record_decl("n", "Named", None),
        rebind_and_collect(
            "relabel",
            field(var("n"), "label"),
            string("zz"),
            TypeTag::Str,
            string("!"),
        ),
        compound_assign(
            BinaryOp::Add,
            field(var("n"), "label"),
            call("relabel", vec![]),
        ),
        println(Some(var("n"))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "Named { label: ab! }\n");
}

#[test]
fn increment_holds_the_container_while_its_index_collects() {
    let program = seq(vec![
        var_decl("xs", TypeTag::Array, Some(array_lit(vec![int(1)]))),
        rebind_and_collect(
            "first",
            var("xs"),
            array_lit(vec![int(7)]),
            TypeTag::Int,
            int(0),
        ),
        println(Some(increment(index(var("xs"), call("first", vec![]))))),
        println(Some(var("xs"))),
    ]);
    let (mut interp, output) = interpreter(fine_grained());
    assert!(interp.run(&program).is_ok());
    assert_eq!(output.output(), "2\n[7]\n");
}

#[test]
fn teardown_empties_the_heap() {
    let program = seq(vec![
        record_def(
            "Named",
            vec![field_decl("label", TypeTag::Str, Some(string("x")))],
        ),
        record_decl("n", "Named", None),
        var_decl("xs", TypeTag::Array, Some(array_lit(vec![string("a")]))),
    ]);
    let (mut interp, _) = interpreter(GcConfig::default());
    assert!(interp.run(&program).is_ok());
    assert!(interp.heap().live_count() > 0);

    interp.teardown();
    assert_eq!(interp.heap().live_count(), 0);
    assert_eq!(interp.heap().phase(), GcPhase::Idle);
}

#[test]
fn collection_can_be_disabled_between_statements() {
    let program = seq(vec![
        var_decl("s", TypeTag::Str, Some(string(""))),
        repeat(10, vec![assign(var("s"), string("x"))]),
    ]);
    let (mut interp, _) = interpreter(GcConfig {
        sweep_slice: 20,
        step_per_statement: false,
    });
    assert!(interp.run(&program).is_ok());
    assert_eq!(interp.heap().stats().cycles, 0);
    assert_eq!(interp.heap().stats().freed, 0);
}
