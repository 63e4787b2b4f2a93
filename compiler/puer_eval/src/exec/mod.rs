//! Evaluation of statements and expressions.
//!
//! Each submodule adds an `impl Interpreter` block:
//! - `stmt`: statements, declarations and loops
//! - `expr`: expressions
//! - `place`: assignable locations
//! - `call`: builtin and user function calls

mod call;
mod control;
mod expr;
mod place;
mod stmt;

pub use control::ControlSignal;
