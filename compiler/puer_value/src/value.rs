//! The runtime value type.

use puer_gc::{GcRef, Trace, Tracer};
use puer_ir::TypeTag;

use crate::errors::{type_mismatch, EvalError};

/// A runtime value.
///
/// Values are plain data and are copied on assignment. Reference variants
/// carry a [`GcRef`] to an object owned by the heap; the value does not keep
/// that object alive by itself, only reachability from a root does.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    UInt(u32),
    Long(i64),
    Float(f32),
    Bool(bool),
    Str(GcRef),
    Array(GcRef),
    Record(GcRef),
    Void,
}

impl Value {
    /// The tag of the active variant. Never [`TypeTag::Any`].
    pub const fn type_tag(self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::UInt(_) => TypeTag::UInt,
            Value::Long(_) => TypeTag::Long,
            Value::Float(_) => TypeTag::Float,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::Str,
            Value::Array(_) => TypeTag::Array,
            Value::Record(_) => TypeTag::Record,
            Value::Void => TypeTag::Void,
        }
    }

    /// The heap handle carried by reference variants.
    #[inline]
    pub const fn gc_ref(self) -> Option<GcRef> {
        match self {
            Value::Str(r) | Value::Array(r) | Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Zero value for tags that need no heap object.
    pub const fn zero(tag: TypeTag) -> Option<Value> {
        match tag {
            TypeTag::Int => Some(Value::Int(0)),
            TypeTag::UInt => Some(Value::UInt(0)),
            TypeTag::Long => Some(Value::Long(0)),
            TypeTag::Float => Some(Value::Float(0.0)),
            TypeTag::Bool => Some(Value::Bool(false)),
            TypeTag::Void => Some(Value::Void),
            TypeTag::Str | TypeTag::Array | TypeTag::Record | TypeTag::Any => None,
        }
    }

    /// Integral payload usable as an index or size.
    pub fn as_index(self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(v)),
            Value::UInt(v) => Some(i64::from(v)),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Truth value for conditions: `bool` as is, numbers when nonzero.
    pub fn truthy(self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Int(v) => Ok(v != 0),
            Value::UInt(v) => Ok(v != 0),
            Value::Long(v) => Ok(v != 0),
            Value::Float(v) => Ok(v != 0.0),
            other => Err(type_mismatch("condition", TypeTag::Bool, other.type_tag())),
        }
    }
}

impl Trace for Value {
    #[inline]
    fn trace(&self, tracer: &mut Tracer<'_>) {
        tracer.mark_opt(self.gc_ref());
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_match_their_tag() {
        for tag in TypeTag::NUMERIC {
            let zero = Value::zero(tag);
            assert_eq!(zero.map(Value::type_tag), Some(tag));
        }
        assert_eq!(Value::zero(TypeTag::Str), None);
    }

    #[test]
    fn truthiness() {
        assert!(Value::Int(3).truthy().is_ok_and(|b| b));
        assert!(Value::Float(0.0).truthy().is_ok_and(|b| !b));
        assert!(Value::Void.truthy().is_err());
    }

    #[test]
    fn index_conversion() {
        assert_eq!(Value::UInt(7).as_index(), Some(7));
        assert_eq!(Value::Int(-1).as_index(), Some(-1));
        assert_eq!(Value::Float(1.0).as_index(), None);
        assert_eq!(Value::Bool(true).as_index(), None);
    }
}
