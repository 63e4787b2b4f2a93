//! Typed facade over the collector.
//!
//! The evaluator never talks to [`Collector`] directly: it allocates strings,
//! arrays, records and scopes here and gets typed views back. A handle that
//! no longer resolves, or resolves to the wrong kind of object, is reported
//! as [`dangling_reference`].

use std::fmt::Write as _;

use puer_gc::{Collector, GcConfig, GcPhase, GcRef, GcStats, Trace};
use puer_ir::TypeTag;

use crate::errors::{
    dangling_reference, nesting_too_deep, type_mismatch, EvalError, EvalResult,
};
use crate::object::{ArrayObject, HeapObject, RecordObject, ScopeObject, StrObject};
use crate::record::{RecordId, RecordRegistry};
use crate::Value;

macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, r: GcRef) -> Result<&$ty, EvalError> {
            match self.gc.get(r) {
                Some(HeapObject::$variant(obj)) => Ok(obj),
                _ => Err(dangling_reference()),
            }
        }

        pub fn $get_mut(&mut self, r: GcRef) -> Result<&mut $ty, EvalError> {
            match self.gc.get_mut(r) {
                Some(HeapObject::$variant(obj)) => Ok(obj),
                _ => Err(dangling_reference()),
            }
        }
    };
}

/// Deepest array/record nesting that copying, printing and shape checks
/// follow. An array can contain itself (via `append`), so these walks need a
/// bound.
pub const MAX_NESTING: usize = 256;

/// Owner of every runtime heap object.
pub struct Heap {
    gc: Collector<HeapObject>,
}

impl Heap {
    pub fn new(config: GcConfig) -> Self {
        Heap {
            gc: Collector::new(config),
        }
    }

    /// Allocate a raw object.
    pub fn alloc(&mut self, object: HeapObject) -> Result<GcRef, EvalError> {
        Ok(self.gc.alloc(object)?)
    }

    pub fn alloc_string(&mut self, bytes: impl Into<Vec<u8>>) -> EvalResult {
        let r = self.alloc(HeapObject::Str(StrObject {
            bytes: bytes.into(),
        }))?;
        Ok(Value::Str(r))
    }

    /// Allocate an array. The caller guarantees every item is tagged `elem`.
    pub fn alloc_array(&mut self, elem: TypeTag, items: Vec<Value>) -> EvalResult {
        let r = self.alloc(HeapObject::Array(ArrayObject::new(elem, items)))?;
        Ok(Value::Array(r))
    }

    pub fn alloc_record(&mut self, def: RecordId, fields: Vec<Value>) -> EvalResult {
        let r = self.alloc(HeapObject::Record(RecordObject { def, fields }))?;
        Ok(Value::Record(r))
    }

    pub fn alloc_scope(&mut self, parent: Option<GcRef>) -> Result<GcRef, EvalError> {
        self.alloc(HeapObject::Scope(ScopeObject::new(parent)))
    }

    typed_access!(string, string_mut, Str, StrObject);
    typed_access!(array, array_mut, Array, ArrayObject);
    typed_access!(record, record_mut, Record, RecordObject);
    typed_access!(scope, scope_mut, Scope, ScopeObject);

    /// Write barrier for a handle stored into a heap object or root.
    #[inline]
    pub fn shade(&mut self, r: GcRef) {
        self.gc.shade(r);
    }

    /// Write barrier for a stored value; scalars are ignored.
    #[inline]
    pub fn shade_value(&mut self, value: Value) {
        if let Some(r) = value.gc_ref() {
            self.gc.shade(r);
        }
    }

    /// Zero value of `tag`: numeric zero, `false`, or a fresh empty string.
    pub fn zero_value(&mut self, tag: TypeTag) -> EvalResult {
        match Value::zero(tag) {
            Some(v) => Ok(v),
            None if tag == TypeTag::Str => self.alloc_string(Vec::new()),
            None => Err(type_mismatch("zero initialization", TypeTag::Int, tag)),
        }
    }

    /// Copy `value`: strings and arrays get fresh heap objects (recursively
    /// for nested arrays), everything else is copied as is.
    pub fn clone_value(&mut self, value: Value) -> EvalResult {
        self.clone_nested(value, 0)
    }

    fn clone_nested(&mut self, value: Value, depth: usize) -> EvalResult {
        match value {
            Value::Str(r) => {
                let bytes = self.string(r)?.bytes.clone();
                self.alloc_string(bytes)
            }
            Value::Array(r) => {
                if depth >= MAX_NESTING {
                    return Err(nesting_too_deep(MAX_NESTING));
                }
                let src = self.array(r)?;
                let elem = src.elem;
                let items = src.items.clone();
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.clone_nested(item, depth + 1)?);
                }
                self.alloc_array(elem, copied)
            }
            other => Ok(other),
        }
    }

    /// First element-type difference between the array `expected` and the
    /// array `got`, following the first row of nested arrays. An empty level
    /// matches anything.
    pub fn array_shape_mismatch(
        &self,
        expected: GcRef,
        got: GcRef,
    ) -> Result<Option<(TypeTag, TypeTag)>, EvalError> {
        let (mut expected, mut got) = (expected, got);
        for _ in 0..MAX_NESTING {
            if expected == got {
                return Ok(None);
            }
            let (want, have) = (self.array(expected)?, self.array(got)?);
            if want.elem != have.elem {
                return Ok(Some((want.elem, have.elem)));
            }
            match (want.items.first(), have.items.first()) {
                (Some(Value::Array(w)), Some(Value::Array(h))) => {
                    expected = *w;
                    got = *h;
                }
                _ => return Ok(None),
            }
        }
        Err(nesting_too_deep(MAX_NESTING))
    }

    /// Render `value` the way `print` shows it.
    pub fn format_value(&self, value: Value, records: &RecordRegistry) -> Result<String, EvalError> {
        let mut out = String::new();
        self.write_value(&mut out, value, records, 0)?;
        Ok(out)
    }

    fn write_value(
        &self,
        out: &mut String,
        value: Value,
        records: &RecordRegistry,
        depth: usize,
    ) -> Result<(), EvalError> {
        if depth >= MAX_NESTING && matches!(value, Value::Array(_) | Value::Record(_)) {
            return Err(nesting_too_deep(MAX_NESTING));
        }
        // Writing into a String cannot fail.
        match value {
            Value::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Value::UInt(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Long(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Float(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Bool(v) => out.push_str(if v { "true" } else { "false" }),
            Value::Void => out.push_str("void"),
            Value::Str(r) => out.push_str(&String::from_utf8_lossy(&self.string(r)?.bytes)),
            Value::Array(r) => {
                out.push('[');
                for (i, item) in self.array(r)?.items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, *item, records, depth + 1)?;
                }
                out.push(']');
            }
            Value::Record(r) => {
                let rec = self.record(r)?;
                let def = records.get(rec.def)?;
                out.push_str(&def.name);
                out.push_str(" {");
                for (i, (name, field)) in def.fields.iter().zip(&rec.fields).enumerate() {
                    out.push_str(if i > 0 { ", " } else { " " });
                    out.push_str(name);
                    out.push_str(": ");
                    self.write_value(out, *field, records, depth + 1)?;
                }
                out.push_str(if rec.fields.is_empty() { "}" } else { " }" });
            }
        }
        Ok(())
    }

    /// One quantum of incremental collection. Returns `false` when this call
    /// finished a cycle.
    pub fn collect_step<R: Trace + ?Sized>(&mut self, roots: &R) -> bool {
        self.gc.collect_step(roots)
    }

    /// Complete collection; returns the number of objects freed.
    pub fn collect_full<R: Trace + ?Sized>(&mut self, roots: &R) -> u64 {
        self.gc.collect_full(roots)
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.gc.live_count()
    }

    #[inline]
    pub fn is_live(&self, r: GcRef) -> bool {
        self.gc.is_live(r)
    }

    #[inline]
    pub fn phase(&self) -> GcPhase {
        self.gc.phase()
    }

    #[inline]
    pub fn stats(&self) -> GcStats {
        self.gc.stats()
    }

    #[inline]
    pub fn config(&self) -> GcConfig {
        self.gc.config()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(GcConfig::default())
    }
}
