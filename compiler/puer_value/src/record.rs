//! Record definitions and their registry.
//!
//! Definitions are schemas: registered once, never mutated, and dropped only
//! when the registry is cleared at teardown. They live outside the collector,
//! but their default values may be heap objects (string defaults, nested
//! records), so the registry is part of the root set.

use puer_gc::{Trace, Tracer};
use puer_ir::{Name, TypeTag};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{
    malformed_node, out_of_memory, redeclaration, unknown_field, unknown_record, EvalError,
};
use crate::Value;

/// Index of a definition in its [`RecordRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(u32);

impl RecordId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A record schema.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDef {
    pub name: Name,
    /// Field names in declaration order.
    pub fields: Vec<Name>,
    /// Declared field types, parallel to `fields`.
    pub types: Vec<TypeTag>,
    /// Default values, parallel to `fields`.
    pub defaults: Vec<Value>,
    index: FxHashMap<Name, usize>,
}

impl RecordDef {
    /// Build a definition from `(name, type, default)` triples.
    pub fn new(name: impl Into<Name>, fields: Vec<(Name, TypeTag, Value)>) -> Self {
        let mut names = Vec::with_capacity(fields.len());
        let mut types = Vec::with_capacity(fields.len());
        let mut defaults = Vec::with_capacity(fields.len());
        let mut index = FxHashMap::default();
        for (i, (field, ty, default)) in fields.into_iter().enumerate() {
            index.insert(field.clone(), i);
            names.push(field);
            types.push(ty);
            defaults.push(default);
        }
        RecordDef {
            name: name.into(),
            fields: names,
            types,
            defaults,
            index,
        }
    }

    /// Position of `field`, or an unknown-field error.
    pub fn field_index(&self, field: &str) -> Result<usize, EvalError> {
        self.index
            .get(field)
            .copied()
            .ok_or_else(|| unknown_field(&self.name, field))
    }
}

/// Name-to-definition table.
#[derive(Debug, Default)]
pub struct RecordRegistry {
    defs: Vec<RecordDef>,
    by_name: FxHashMap<Name, RecordId>,
}

impl RecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def`. A second definition with the same name is rejected.
    pub fn register(&mut self, def: RecordDef) -> Result<RecordId, EvalError> {
        if self.by_name.contains_key(&def.name) {
            return Err(redeclaration(&def.name));
        }
        let id = RecordId(u32::try_from(self.defs.len()).map_err(|_| out_of_memory())?);
        debug!(record = %def.name, fields = def.fields.len(), "record registered");
        self.by_name.insert(def.name.clone(), id);
        self.defs.push(def);
        Ok(id)
    }

    pub fn find(&self, name: &str) -> Option<RecordId> {
        self.by_name.get(name).copied()
    }

    /// Like [`find`](Self::find), but an unknown name is an error.
    pub fn lookup(&self, name: &str) -> Result<RecordId, EvalError> {
        self.find(name).ok_or_else(|| unknown_record(name))
    }

    /// The definition behind `id`.
    ///
    /// Ids are only handed out by [`register`](Self::register); after
    /// [`clear`](Self::clear) no instances survive to hold one.
    pub fn get(&self, id: RecordId) -> Result<&RecordDef, EvalError> {
        self.defs
            .get(id.index())
            .ok_or_else(|| malformed_node("record id from a cleared registry"))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Drop every definition.
    pub fn clear(&mut self) {
        self.defs.clear();
        self.by_name.clear();
    }
}

impl Trace for RecordRegistry {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        for def in &self.defs {
            def.defaults.trace(tracer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn point() -> RecordDef {
        RecordDef::new(
            "Point",
            vec![
                ("x".to_string(), TypeTag::Int, Value::Int(0)),
                ("y".to_string(), TypeTag::Int, Value::Int(7)),
            ],
        )
    }

    #[test]
    fn field_indices_follow_declaration_order() {
        let def = point();
        assert_eq!(def.field_index("x"), Ok(0));
        assert_eq!(def.field_index("y"), Ok(1));
        assert_eq!(def.defaults, vec![Value::Int(0), Value::Int(7)]);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let Err(err) = point().field_index("z") else {
            panic!("field z should not exist");
        };
        assert_eq!(
            err.kind,
            EvalErrorKind::UnknownField {
                record: "Point".into(),
                field: "z".into()
            }
        );
    }

    #[test]
    fn registry_rejects_duplicates() {
        let mut reg = RecordRegistry::new();
        let id = reg.register(point());
        assert!(id.is_ok());
        assert!(reg.register(point()).is_err());
        assert_eq!(reg.find("Point"), id.ok());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut reg = RecordRegistry::new();
        let _ = reg.register(point());
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.lookup("Point").is_err());
    }
}
