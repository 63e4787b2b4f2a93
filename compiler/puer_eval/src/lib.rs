//! Puer Eval - the tree-walking evaluator of the Puer runtime.
//!
//! Given a syntax tree from `puer_ir`, the [`Interpreter`] executes it
//! statement by statement against a garbage-collected heap.
//!
//! # Architecture
//!
//! - [`Environment`]: dynamically scoped variables stored in heap scopes,
//!   with reference aliases for record parameters
//! - `exec`: statement, expression, assignment and call evaluation
//! - [`evaluate_binary`] / [`evaluate_unary`]: operator dispatch over a
//!   `[type][operator]` table
//! - [`BuiltinRegistry`]: native functions, with the standard set from
//!   [`register_stdlib`]
//! - [`diagnostics`]: fatal error reporting and exit codes
//!
//! The collector runs incrementally, one step after each statement of a
//! sequence, and fully on `gc_collect()` and at teardown.
//!
//! # Re-exports
//!
//! Value and error types come from `puer_value`: [`Value`], [`Heap`],
//! [`EvalError`], [`EvalResult`].

mod config;
pub mod diagnostics;
mod environment;
pub mod exec;
mod functions;
pub mod interpreter;
mod operators;
mod print_handler;
mod stack;
mod stdlib;

#[cfg(test)]
mod tests;

use std::sync::Once;

pub use config::{EvalConfig, GcConfig, DEFAULT_MAX_CALL_DEPTH};
pub use diagnostics::{format_diagnostic, report_fatal, run_or_exit, run_to_exit_code};
pub use environment::{Environment, Slot};
pub use exec::ControlSignal;
pub use functions::{Builtin, BuiltinFn, BuiltinRegistry, FunctionTable};
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use operators::{evaluate_binary, evaluate_unary, lookup as lookup_operator, BinaryFn};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use stack::ensure_sufficient_stack;
pub use stdlib::register_stdlib;

pub use puer_value::{EvalError, EvalErrorKind, EvalResult, Heap, Value};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=puer_eval=debug,puer_gc=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
