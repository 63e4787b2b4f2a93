//! Fatal error reporting.
//!
//! Every runtime error ends the program. It is reported on stderr as
//! `Error at line L, column C: message`, or `Error: message` when the failing
//! node carries no source position, and the process exits with status 1.

use puer_ir::Node;
use puer_value::EvalError;
use tracing::error;

use crate::Interpreter;

/// Exit status after a runtime error.
pub const EXIT_FAILURE: i32 = 1;

/// Render `err` as a one-line diagnostic.
pub fn format_diagnostic(err: &EvalError) -> String {
    match err.pos.filter(|pos| pos.is_known()) {
        Some(pos) => format!("Error at {pos}: {err}"),
        None => format!("Error: {err}"),
    }
}

/// Report `err` on stderr and exit with [`EXIT_FAILURE`].
#[cold]
pub fn report_fatal(err: &EvalError) -> ! {
    error!(error = %err, pos = ?err.pos, "runtime error");
    eprintln!("{}", format_diagnostic(err));
    std::process::exit(EXIT_FAILURE)
}

/// Run `program`, tear the interpreter down, and return the process exit
/// status. A runtime error is reported on stderr.
pub fn run_to_exit_code<'a>(interp: &mut Interpreter<'a>, program: &'a Node) -> i32 {
    let result = interp.run(program);
    interp.teardown();
    match result {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, pos = ?err.pos, "runtime error");
            eprintln!("{}", format_diagnostic(&err));
            EXIT_FAILURE
        }
    }
}

/// Run `program` and exit the process on a runtime error.
pub fn run_or_exit<'a>(interp: &mut Interpreter<'a>, program: &'a Node) {
    if let Err(err) = interp.run(program) {
        interp.teardown();
        report_fatal(&err);
    }
}
