//! Runtime error types.
//!
//! Every violation the runtime detects is fatal: it aborts the whole
//! program. Internally errors travel as `Result<_, EvalError>` up to the
//! process boundary, where they are reported once.
//!
//! Factory functions (`undefined_variable()`, `division_by_zero()`, ...) are
//! the public way to build errors; they are `#[cold]` so the happy path stays
//! lean.

use puer_gc::GcError;
use puer_ir::{Position, TypeTag};
use thiserror::Error;

use crate::Value;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    // Names
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },
    #[error("redeclaration of '{name}' in the same scope")]
    Redeclaration { name: String },
    #[error("function '{name}' is already defined")]
    DuplicateFunction { name: String },

    // Types
    #[error("type mismatch in {context}: expected {expected}, got {got}")]
    TypeMismatch {
        context: String,
        expected: TypeTag,
        got: TypeTag,
    },
    #[error("record type mismatch in {context}: expected {expected}, got {got}")]
    RecordMismatch {
        context: String,
        expected: String,
        got: String,
    },
    #[error("cannot combine {left} and {right}")]
    OperandMismatch { left: TypeTag, right: TypeTag },
    #[error("operator `{op}` not supported for type {ty}")]
    UnsupportedOperator { op: &'static str, ty: TypeTag },
    #[error("cannot cast {from} to {to}")]
    InvalidCast { from: TypeTag, to: TypeTag },

    // Calls
    #[error("function '{name}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("argument for record parameter '{param}' must be a variable")]
    ReferenceArgument { param: String },
    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },

    // Indexing
    #[error("index {index} out of bounds (size {len})")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("invalid array size {size}")]
    InvalidArraySize { size: i64 },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,

    // Records
    #[error("unknown record type '{name}'")]
    UnknownRecord { name: String },
    #[error("record '{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },
    #[error("field '{field}' of record '{record}' needs a default value")]
    MissingDefault { record: String, field: String },

    // Assignment
    #[error("invalid left-hand side: cannot assign to {what}")]
    InvalidAssignTarget { what: &'static str },

    // Resources and internal faults
    #[error("out of memory")]
    OutOfMemory,
    #[error("value nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },
    #[error("malformed syntax tree: {detail}")]
    MalformedNode { detail: String },
    #[error("internal error: dangling heap reference")]
    DanglingReference,
}

/// A fatal runtime error with an optional source position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub pos: Option<Position>,
}

impl EvalError {
    #[inline]
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, pos: None }
    }

    /// Attach a source position, replacing any existing one.
    #[must_use]
    pub fn at(mut self, pos: Position) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Attach `pos` unless a position is already known.
    ///
    /// Errors raised in helpers that never see a node pick up the position of
    /// the innermost enclosing node on their way out.
    #[must_use]
    pub fn or_at(mut self, pos: Position) -> Self {
        if self.pos.is_none() && pos.is_known() {
            self.pos = Some(pos);
        }
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

impl From<GcError> for EvalError {
    fn from(err: GcError) -> Self {
        match err {
            GcError::OutOfMemory => out_of_memory(),
        }
    }
}

// Names

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn redeclaration(name: &str) -> EvalError {
    EvalErrorKind::Redeclaration {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn duplicate_function(name: &str) -> EvalError {
    EvalErrorKind::DuplicateFunction {
        name: name.to_string(),
    }
    .into()
}

// Types

/// Type mismatch; `context` reads as "in {context}", e.g. "initialization of 'x'".
#[cold]
pub fn type_mismatch(context: impl Into<String>, expected: TypeTag, got: TypeTag) -> EvalError {
    EvalErrorKind::TypeMismatch {
        context: context.into(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn record_mismatch(context: impl Into<String>, expected: &str, got: &str) -> EvalError {
    EvalErrorKind::RecordMismatch {
        context: context.into(),
        expected: expected.to_string(),
        got: got.to_string(),
    }
    .into()
}

#[cold]
pub fn operand_mismatch(left: TypeTag, right: TypeTag) -> EvalError {
    EvalErrorKind::OperandMismatch { left, right }.into()
}

#[cold]
pub fn unsupported_operator(op: &'static str, ty: TypeTag) -> EvalError {
    EvalErrorKind::UnsupportedOperator { op, ty }.into()
}

#[cold]
pub fn invalid_cast(from: TypeTag, to: TypeTag) -> EvalError {
    EvalErrorKind::InvalidCast { from, to }.into()
}

// Calls

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn reference_argument(param: &str) -> EvalError {
    EvalErrorKind::ReferenceArgument {
        param: param.to_string(),
    }
    .into()
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalErrorKind::StackOverflow { depth }.into()
}

// Indexing

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalErrorKind::IndexOutOfBounds { index, len }.into()
}

#[cold]
pub fn invalid_array_size(size: i64) -> EvalError {
    EvalErrorKind::InvalidArraySize { size }.into()
}

// Arithmetic

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalErrorKind::ModuloByZero.into()
}

// Records

#[cold]
pub fn unknown_record(name: &str) -> EvalError {
    EvalErrorKind::UnknownRecord {
        name: name.to_string(),
    }
    .into()
}

#[cold]
pub fn unknown_field(record: &str, field: &str) -> EvalError {
    EvalErrorKind::UnknownField {
        record: record.to_string(),
        field: field.to_string(),
    }
    .into()
}

#[cold]
pub fn missing_default(record: &str, field: &str) -> EvalError {
    EvalErrorKind::MissingDefault {
        record: record.to_string(),
        field: field.to_string(),
    }
    .into()
}

// Assignment

#[cold]
pub fn invalid_assign_target(what: &'static str) -> EvalError {
    EvalErrorKind::InvalidAssignTarget { what }.into()
}

// Resources and internal faults

#[cold]
pub fn out_of_memory() -> EvalError {
    EvalErrorKind::OutOfMemory.into()
}

#[cold]
pub fn nesting_too_deep(limit: usize) -> EvalError {
    EvalErrorKind::NestingTooDeep { limit }.into()
}

#[cold]
pub fn malformed_node(detail: impl Into<String>) -> EvalError {
    EvalErrorKind::MalformedNode {
        detail: detail.into(),
    }
    .into()
}

#[cold]
pub fn dangling_reference() -> EvalError {
    EvalErrorKind::DanglingReference.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn or_at_keeps_the_innermost_position() {
        let err = division_by_zero()
            .or_at(Position::new(3, 7))
            .or_at(Position::new(1, 1));
        assert_eq!(err.pos, Some(Position::new(3, 7)));
    }

    #[test]
    fn or_at_ignores_unknown_positions() {
        let err = modulo_by_zero().or_at(Position::DUMMY);
        assert_eq!(err.pos, None);
    }

    #[test]
    fn messages() {
        assert_eq!(
            index_out_of_bounds(5, 3).to_string(),
            "index 5 out of bounds (size 3)"
        );
        assert_eq!(
            type_mismatch("initialization of 'x'", TypeTag::Int, TypeTag::Str).to_string(),
            "type mismatch in initialization of 'x': expected int, got string"
        );
        assert_eq!(
            unsupported_operator("%", TypeTag::Float).to_string(),
            "operator `%` not supported for type float"
        );
    }

    #[test]
    fn gc_errors_map_to_out_of_memory() {
        let err: EvalError = GcError::OutOfMemory.into();
        assert_eq!(err.kind, EvalErrorKind::OutOfMemory);
    }
}
