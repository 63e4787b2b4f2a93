//! Heap object family.
//!
//! Each variant of [`HeapObject`] knows how to enumerate its outgoing handles
//! through [`Trace`]; that is the scan callback the collector invokes while
//! marking.

use puer_gc::{GcRef, Trace, Tracer};
use puer_ir::{Name, TypeTag};
use rustc_hash::FxHashMap;

use crate::record::RecordId;
use crate::Value;

/// Homogeneous growable array.
///
/// Every item's tag equals `elem`. Storage grows by doubling.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayObject {
    pub elem: TypeTag,
    pub items: Vec<Value>,
}

impl ArrayObject {
    pub fn new(elem: TypeTag, items: Vec<Value>) -> Self {
        ArrayObject { elem, items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Byte string. Mutable only through indexed character assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrObject {
    pub bytes: Vec<u8>,
}

impl StrObject {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Instance of a registered record definition.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordObject {
    pub def: RecordId,
    /// Field values in definition order.
    pub fields: Vec<Value>,
}

/// A variable binding.
#[derive(Clone, Debug, PartialEq)]
pub enum VarEntry {
    /// The binding owns its value.
    Owned(Value),
    /// The binding stores nothing itself; reads and writes go to variable
    /// `name` of `scope`. Always points at an `Owned` entry.
    Alias { scope: GcRef, name: Name },
}

/// One frame of the environment stack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeObject {
    pub vars: FxHashMap<Name, VarEntry>,
    pub parent: Option<GcRef>,
}

impl ScopeObject {
    pub fn new(parent: Option<GcRef>) -> Self {
        ScopeObject {
            vars: FxHashMap::default(),
            parent,
        }
    }
}

/// Every object the collector manages.
#[derive(Clone, Debug, PartialEq)]
pub enum HeapObject {
    Array(ArrayObject),
    Str(StrObject),
    Record(RecordObject),
    Scope(ScopeObject),
}

impl HeapObject {
    /// Kind name for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            HeapObject::Array(_) => "array",
            HeapObject::Str(_) => "string",
            HeapObject::Record(_) => "record",
            HeapObject::Scope(_) => "scope",
        }
    }
}

impl Trace for ArrayObject {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        // Arrays of scalars hold no handles.
        if self.elem.is_reference() {
            self.items.trace(tracer);
        }
    }
}

impl Trace for RecordObject {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.fields.trace(tracer);
    }
}

impl Trace for VarEntry {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        match self {
            VarEntry::Owned(value) => value.trace(tracer),
            VarEntry::Alias { scope, .. } => tracer.mark(*scope),
        }
    }
}

impl Trace for ScopeObject {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        tracer.mark_opt(self.parent);
        for entry in self.vars.values() {
            entry.trace(tracer);
        }
    }
}

impl Trace for HeapObject {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        match self {
            HeapObject::Array(a) => a.trace(tracer),
            HeapObject::Str(_) => {}
            HeapObject::Record(r) => r.trace(tracer),
            HeapObject::Scope(s) => s.trace(tracer),
        }
    }
}
