//! Numeric tower and conversions.
//!
//! Widening order: `bool < int < unsigned < long < float`. Strings, arrays,
//! records and void never take part in coercion; they only meet operators
//! through type-specific overrides (string concatenation, field access).

use puer_ir::TypeTag;

use crate::errors::{invalid_cast, operand_mismatch, EvalError};
use crate::Value;

/// The type both operands of a binary operator are converted to.
///
/// Equal tags yield themselves; two numeric tags yield the wider one.
pub fn common_type(a: TypeTag, b: TypeTag) -> Result<TypeTag, EvalError> {
    if a == b {
        return Ok(a);
    }
    match (a.numeric_rank(), b.numeric_rank()) {
        (Some(ra), Some(rb)) => Ok(if ra >= rb { a } else { b }),
        _ => Err(operand_mismatch(a, b)),
    }
}

/// Convert both operands to their [`common_type`] and return it.
pub fn coerce(a: &mut Value, b: &mut Value) -> Result<TypeTag, EvalError> {
    let target = common_type(a.type_tag(), b.type_tag())?;
    if target.is_numeric() {
        *a = cast_to(*a, target)?;
        *b = cast_to(*b, target)?;
    }
    Ok(target)
}

/// Explicit conversion between `int`, `unsigned`, `long`, `float` and `bool`.
///
/// Integer conversions wrap; float-to-integer conversions truncate toward
/// zero and saturate. Converting to `bool` tests for nonzero.
pub fn cast_to(value: Value, target: TypeTag) -> Result<Value, EvalError> {
    let from = value.type_tag();
    if from == target {
        return Ok(value);
    }
    let out = match target {
        TypeTag::Int => Value::Int(match value {
            Value::UInt(v) => v as i32,
            Value::Long(v) => v as i32,
            Value::Float(v) => v as i32,
            Value::Bool(v) => i32::from(v),
            _ => return Err(invalid_cast(from, target)),
        }),
        TypeTag::UInt => Value::UInt(match value {
            Value::Int(v) => v as u32,
            Value::Long(v) => v as u32,
            Value::Float(v) => v as u32,
            Value::Bool(v) => u32::from(v),
            _ => return Err(invalid_cast(from, target)),
        }),
        TypeTag::Long => Value::Long(match value {
            Value::Int(v) => i64::from(v),
            Value::UInt(v) => i64::from(v),
            Value::Float(v) => v as i64,
            Value::Bool(v) => i64::from(v),
            _ => return Err(invalid_cast(from, target)),
        }),
        TypeTag::Float => Value::Float(match value {
            Value::Int(v) => v as f32,
            Value::UInt(v) => v as f32,
            Value::Long(v) => v as f32,
            Value::Bool(v) => f32::from(u8::from(v)),
            _ => return Err(invalid_cast(from, target)),
        }),
        TypeTag::Bool => Value::Bool(match value {
            Value::Int(v) => v != 0,
            Value::UInt(v) => v != 0,
            Value::Long(v) => v != 0,
            Value::Float(v) => v != 0.0,
            _ => return Err(invalid_cast(from, target)),
        }),
        TypeTag::Str | TypeTag::Array | TypeTag::Record | TypeTag::Void | TypeTag::Any => {
            return Err(invalid_cast(from, target))
        }
    };
    Ok(out)
}

/// The conversion applied on initialization, assignment, argument passing
/// and return: identity or `bool`/`int` interchange, nothing else.
///
/// `Any` accepts every value. Returns `None` when the value does not fit;
/// the caller reports the mismatch with its own context.
pub fn implicit_convert(value: Value, target: TypeTag) -> Option<Value> {
    match (value, target) {
        (_, TypeTag::Any) => Some(value),
        (v, t) if v.type_tag() == t => Some(v),
        (Value::Bool(b), TypeTag::Int) => Some(Value::Int(i32::from(b))),
        (Value::Int(v), TypeTag::Bool) => Some(Value::Bool(v != 0)),
        _ => None,
    }
}
