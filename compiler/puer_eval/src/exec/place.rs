//! Assignable locations.
//!
//! Assignment resolves its target to a [`Place`] first, then reads or writes
//! through it. Compound assignment and `++`/`--` therefore evaluate the
//! target's subexpressions (an index, say) exactly once.
//!
//! A stored value is converted to the type the location already holds, and
//! the write barrier is applied to it.

use puer_ir::{Node, NodeKind, TypeTag};
use puer_value::errors::{
    dangling_reference, invalid_assign_target, record_mismatch, type_mismatch, EvalError,
};
use puer_value::{implicit_convert, EvalResult, GcRef, Value};

use super::expr::checked_index;
use crate::{Environment, Interpreter, Slot};

/// A location an assignment can write to.
#[derive(Clone, Debug)]
pub(crate) enum Place {
    Var(Slot),
    ArrayItem { array: GcRef, index: usize },
    /// One byte of a string, read and written as an `int`.
    StrByte { string: GcRef, index: usize },
    Field { record: GcRef, index: usize },
}

impl<'a> Interpreter<'a> {
    pub(crate) fn resolve_place(&mut self, target: &'a Node) -> Result<Place, EvalError> {
        self.resolve_place_inner(target)
            .map_err(|e| e.or_at(target.pos))
    }

    fn resolve_place_inner(&mut self, target: &'a Node) -> Result<Place, EvalError> {
        match &target.kind {
            NodeKind::Var(name) => Ok(Place::Var(self.env.resolve(&self.heap, name)?)),
            NodeKind::Index {
                target: container,
                index,
            } => {
                let container = self.eval_expr(container)?;
                let index = self.eval_index(index)?;
                match container {
                    Value::Array(array) => {
                        let len = self.heap.array(array)?.len();
                        Ok(Place::ArrayItem {
                            array,
                            index: checked_index(index, len)?,
                        })
                    }
                    Value::Str(string) => {
                        let len = self.heap.string(string)?.len();
                        Ok(Place::StrByte {
                            string,
                            index: checked_index(index, len)?,
                        })
                    }
                    other => Err(type_mismatch(
                        "indexed assignment",
                        TypeTag::Array,
                        other.type_tag(),
                    )),
                }
            }
            NodeKind::Field { target, field } => {
                let record = self.eval_expr(target)?;
                let (record, index) = self.field_slot(record, field)?;
                Ok(Place::Field { record, index })
            }
            other => Err(invalid_assign_target(other.name())),
        }
    }

    pub(crate) fn load(&self, place: &Place) -> EvalResult {
        match place {
            Place::Var(slot) => Environment::read(&self.heap, slot),
            Place::ArrayItem { array, index } => self
                .heap
                .array(*array)?
                .items
                .get(*index)
                .copied()
                .ok_or_else(dangling_reference),
            Place::StrByte { string, index } => self
                .heap
                .string(*string)?
                .bytes
                .get(*index)
                .map(|b| Value::Int(i32::from(*b)))
                .ok_or_else(dangling_reference),
            Place::Field { record, index } => self
                .heap
                .record(*record)?
                .fields
                .get(*index)
                .copied()
                .ok_or_else(dangling_reference),
        }
    }

    /// Write `value` to `place` and return what was stored.
    pub(crate) fn store(&mut self, place: &Place, value: Value) -> EvalResult {
        match place {
            Place::Var(slot) => {
                let current = Environment::read(&self.heap, slot)?;
                let value =
                    self.convert_for_store(current, value, || format!("assignment to '{}'", slot.name))?;
                Environment::write(&mut self.heap, slot, value)?;
                Ok(value)
            }
            Place::ArrayItem { array, index } => {
                let current = self
                    .heap
                    .array(*array)?
                    .items
                    .get(*index)
                    .copied()
                    .ok_or_else(dangling_reference)?;
                let value = self.convert_for_store(current, value, || {
                    "array element assignment".to_string()
                })?;
                let item = self
                    .heap
                    .array_mut(*array)?
                    .items
                    .get_mut(*index)
                    .ok_or_else(dangling_reference)?;
                *item = value;
                self.heap.shade_value(value);
                Ok(value)
            }
            Place::StrByte { string, index } => {
                let Some(Value::Int(code)) = implicit_convert(value, TypeTag::Int) else {
                    return Err(type_mismatch(
                        "string character assignment",
                        TypeTag::Int,
                        value.type_tag(),
                    ));
                };
                let byte = self
                    .heap
                    .string_mut(*string)?
                    .bytes
                    .get_mut(*index)
                    .ok_or_else(dangling_reference)?;
                // Character codes wrap to a byte.
                *byte = code as u8;
                Ok(Value::Int(i32::from(*byte)))
            }
            Place::Field { record, index } => self.store_field(*record, *index, value),
        }
    }

    /// Write field `index` of `record`, converted to the field's current
    /// type.
    pub(crate) fn store_field(&mut self, record: GcRef, index: usize, value: Value) -> EvalResult {
        let current = self
            .heap
            .record(record)?
            .fields
            .get(index)
            .copied()
            .ok_or_else(dangling_reference)?;
        let value = self.convert_for_store(current, value, || "field assignment".to_string())?;
        let field = self
            .heap
            .record_mut(record)?
            .fields
            .get_mut(index)
            .ok_or_else(dangling_reference)?;
        *field = value;
        self.heap.shade_value(value);
        Ok(value)
    }

    /// Convert `value` for a location currently holding `current`. A record
    /// location only accepts an instance of the same schema, an array
    /// location only an array of the same element types.
    fn convert_for_store(
        &self,
        current: Value,
        value: Value,
        context: impl Fn() -> String,
    ) -> EvalResult {
        if let Value::Array(cur) = current {
            let Value::Array(new) = value else {
                return Err(type_mismatch(context(), TypeTag::Array, value.type_tag()));
            };
            if let Some((expected, got)) = self.heap.array_shape_mismatch(cur, new)? {
                return Err(type_mismatch(context(), expected, got));
            }
            return Ok(value);
        }
        if let Value::Record(cur) = current {
            let Value::Record(new) = value else {
                return Err(type_mismatch(context(), TypeTag::Record, value.type_tag()));
            };
            let expected = self.heap.record(cur)?.def;
            let got = self.heap.record(new)?.def;
            if expected != got {
                return Err(record_mismatch(
                    context(),
                    &self.records.get(expected)?.name,
                    &self.records.get(got)?.name,
                ));
            }
            return Ok(value);
        }
        let ty = current.type_tag();
        implicit_convert(value, ty).ok_or_else(|| type_mismatch(context(), ty, value.type_tag()))
    }
}
