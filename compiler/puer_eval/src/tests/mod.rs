//! Whole-program tests: syntax trees built with `puer_ir::build`, run with
//! captured output.

mod gc_tests;
mod operators_tests;

use puer_ir::Node;

use crate::{buffer_handler, EvalError, Interpreter};

/// Run `program` on a fresh interpreter, capturing output.
fn run(program: &Node) -> (Result<(), EvalError>, String) {
    let output = buffer_handler();
    let mut interp = Interpreter::builder()
        .print_handler(output.clone())
        .build();
    let result = interp.run(program);
    (result, output.output())
}

/// Output of a program that must succeed.
fn run_ok(program: &Node) -> String {
    let (result, output) = run(program);
    if let Err(err) = result {
        panic!("program failed: {err} ({:?})\noutput so far:\n{output}", err.pos);
    }
    output
}

/// Error of a program that must fail.
fn run_err(program: &Node) -> EvalError {
    match run(program).0 {
        Ok(()) => panic!("program unexpectedly succeeded"),
        Err(err) => err,
    }
}
