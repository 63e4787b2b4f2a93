//! Puer IR - the syntax tree consumed by the Puer runtime.
//!
//! The front end (lexer and parser) lives outside this workspace. It hands the
//! runtime a tree of [`Node`]s; each node has a [`NodeKind`] carrying its
//! kind-specific payload and named children, plus a source [`Position`] used
//! for diagnostics.
//!
//! Trees are normally produced by the parser, but the [`build`] module offers
//! one constructor per node kind for embedders and tests.

mod ast;
pub mod build;
mod operators;
mod position;
mod types;

pub use ast::{FieldDecl, FuncDef, Name, Node, NodeKind, Param};
pub use operators::{BinaryOp, IncDecOp, LogicalOp, UnaryOp};
pub use position::Position;
pub use types::TypeTag;
