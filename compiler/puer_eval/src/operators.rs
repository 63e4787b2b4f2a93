//! Binary and unary operator dispatch.
//!
//! Numeric binary operators go through a dense `[type][operator]` table of
//! function pointers. Operands are first coerced to their common type, so
//! each table entry only ever sees two values of its row's type. An empty
//! entry means the operator is not defined for that type (modulo on floats,
//! anything but equality on booleans).
//!
//! String concatenation is not in the table; the evaluator handles it before
//! dispatching here because it has to allocate.

use puer_ir::{BinaryOp, TypeTag, UnaryOp};
use puer_value::errors::{
    division_by_zero, malformed_node, modulo_by_zero, unsupported_operator, EvalError,
};
use puer_value::{coerce, EvalResult, Value};

/// One operator specialized to one type.
pub type BinaryFn = fn(Value, Value) -> EvalResult;

type Row = [Option<BinaryFn>; BinaryOp::COUNT];

/// Types with a row in the table, in row order.
const ROW_TYPES: [TypeTag; 5] = [
    TypeTag::Int,
    TypeTag::UInt,
    TypeTag::Long,
    TypeTag::Float,
    TypeTag::Bool,
];

#[inline]
fn row_index(ty: TypeTag) -> Option<usize> {
    ROW_TYPES.iter().position(|t| *t == ty)
}

#[cold]
fn operand_shape() -> EvalError {
    malformed_node("operator table entry called with uncoerced operands")
}

/// Generates the eleven operators for an integer type. Arithmetic wraps, as
/// fixed-width machine integers do.
macro_rules! integer_row {
    ($module:ident, $variant:ident, $prim:ty) => {
        mod $module {
            use super::*;

            fn operands(a: Value, b: Value) -> Result<($prim, $prim), EvalError> {
                match (a, b) {
                    (Value::$variant(x), Value::$variant(y)) => Ok((x, y)),
                    _ => Err(operand_shape()),
                }
            }

            pub(super) fn add(a: Value, b: Value) -> EvalResult {
                let (x, y) = operands(a, b)?;
                Ok(Value::$variant(x.wrapping_add(y)))
            }

            pub(super) fn sub(a: Value, b: Value) -> EvalResult {
                let (x, y) = operands(a, b)?;
                Ok(Value::$variant(x.wrapping_sub(y)))
            }

            pub(super) fn mul(a: Value, b: Value) -> EvalResult {
                let (x, y) = operands(a, b)?;
                Ok(Value::$variant(x.wrapping_mul(y)))
            }

            pub(super) fn div(a: Value, b: Value) -> EvalResult {
                let (x, y) = operands(a, b)?;
                if y == 0 {
                    return Err(division_by_zero());
                }
                Ok(Value::$variant(x.wrapping_div(y)))
            }

            pub(super) fn rem(a: Value, b: Value) -> EvalResult {
                let (x, y) = operands(a, b)?;
                if y == 0 {
                    return Err(modulo_by_zero());
                }
                Ok(Value::$variant(x.wrapping_rem(y)))
            }

            comparisons!($variant);

            pub(super) const ROW: Row = [
                Some(add),
                Some(sub),
                Some(mul),
                Some(div),
                Some(rem),
                Some(lt),
                Some(gt),
                Some(le),
                Some(ge),
                Some(eq),
                Some(ne),
            ];
        }
    };
}

/// Generates the six comparison operators for one variant.
macro_rules! comparisons {
    ($variant:ident) => {
        comparisons!(@one $variant, lt, <);
        comparisons!(@one $variant, gt, >);
        comparisons!(@one $variant, le, <=);
        comparisons!(@one $variant, ge, >=);
        comparisons!(@one $variant, eq, ==);
        comparisons!(@one $variant, ne, !=);
    };
    (@one $variant:ident, $name:ident, $op:tt) => {
        pub(super) fn $name(a: Value, b: Value) -> EvalResult {
            match (a, b) {
                (Value::$variant(x), Value::$variant(y)) => Ok(Value::Bool(x $op y)),
                _ => Err(operand_shape()),
            }
        }
    };
}

integer_row!(int_ops, Int, i32);
integer_row!(uint_ops, UInt, u32);
integer_row!(long_ops, Long, i64);

mod float_ops {
    use super::*;

    fn operands(a: Value, b: Value) -> Result<(f32, f32), EvalError> {
        match (a, b) {
            (Value::Float(x), Value::Float(y)) => Ok((x, y)),
            _ => Err(operand_shape()),
        }
    }

    pub(super) fn add(a: Value, b: Value) -> EvalResult {
        let (x, y) = operands(a, b)?;
        Ok(Value::Float(x + y))
    }

    pub(super) fn sub(a: Value, b: Value) -> EvalResult {
        let (x, y) = operands(a, b)?;
        Ok(Value::Float(x - y))
    }

    pub(super) fn mul(a: Value, b: Value) -> EvalResult {
        let (x, y) = operands(a, b)?;
        Ok(Value::Float(x * y))
    }

    pub(super) fn div(a: Value, b: Value) -> EvalResult {
        let (x, y) = operands(a, b)?;
        if y == 0.0 {
            return Err(division_by_zero());
        }
        Ok(Value::Float(x / y))
    }

    comparisons!(Float);

    pub(super) const ROW: Row = [
        Some(add),
        Some(sub),
        Some(mul),
        Some(div),
        None,
        Some(lt),
        Some(gt),
        Some(le),
        Some(ge),
        Some(eq),
        Some(ne),
    ];
}

mod bool_ops {
    use super::*;

    comparisons!(@one Bool, eq, ==);
    comparisons!(@one Bool, ne, !=);

    pub(super) const ROW: Row = [
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        None,
        Some(eq),
        Some(ne),
    ];
}

static TABLE: [Row; 5] = [
    int_ops::ROW,
    uint_ops::ROW,
    long_ops::ROW,
    float_ops::ROW,
    bool_ops::ROW,
];

/// Table entry for `op` on `ty`, if the operator is defined there.
pub fn lookup(ty: TypeTag, op: BinaryOp) -> Option<BinaryFn> {
    TABLE[row_index(ty)?][op.index()]
}

/// Coerce both operands to their common type and apply `op`.
pub fn evaluate_binary(op: BinaryOp, mut lhs: Value, mut rhs: Value) -> EvalResult {
    let ty = coerce(&mut lhs, &mut rhs)?;
    let func = lookup(ty, op).ok_or_else(|| unsupported_operator(op.as_symbol(), ty))?;
    func(lhs, rhs)
}

/// Apply a prefix operator.
///
/// `-` negates numbers (wrapping for integers). `!` takes a condition value
/// (bool, or a number tested for nonzero) and yields a bool.
pub fn evaluate_unary(op: UnaryOp, operand: Value) -> EvalResult {
    match op {
        UnaryOp::Neg => match operand {
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::UInt(v) => Ok(Value::UInt(v.wrapping_neg())),
            Value::Long(v) => Ok(Value::Long(v.wrapping_neg())),
            Value::Float(v) => Ok(Value::Float(-v)),
            other => Err(unsupported_operator("-", other.type_tag())),
        },
        UnaryOp::Not => match operand {
            Value::Bool(_) | Value::Int(_) | Value::UInt(_) | Value::Long(_) | Value::Float(_) => {
                Ok(Value::Bool(!operand.truthy()?))
            }
            other => Err(unsupported_operator("!", other.type_tag())),
        },
    }
}
