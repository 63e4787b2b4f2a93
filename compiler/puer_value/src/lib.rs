//! Puer Value - runtime values, coercion and heap objects.
//!
//! - [`Value`]: the tagged value every expression evaluates to
//! - [`common_type`], [`coerce`], [`cast_to`], [`implicit_convert`]: the
//!   numeric tower
//! - [`HeapObject`]: arrays, strings, record instances and environment scopes
//! - [`Heap`]: allocation, typed access, deep copy and printing on top of the
//!   collector
//! - [`RecordRegistry`]: record schemas
//! - [`EvalError`]: the runtime error taxonomy

mod coerce;
pub mod errors;
mod heap;
mod object;
mod record;
mod value;

pub use coerce::{cast_to, coerce, common_type, implicit_convert};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use heap::{Heap, MAX_NESTING};
pub use object::{ArrayObject, HeapObject, RecordObject, ScopeObject, StrObject, VarEntry};
pub use record::{RecordDef, RecordId, RecordRegistry};
pub use value::Value;

pub use puer_gc::{GcConfig, GcPhase, GcRef, GcStats, Trace, Tracer};
