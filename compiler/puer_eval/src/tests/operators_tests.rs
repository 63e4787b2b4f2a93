use pretty_assertions::assert_eq;
use proptest::prelude::*;
use puer_ir::{BinaryOp, TypeTag, UnaryOp};
use puer_value::{EvalError, EvalErrorKind, Heap, Value};

use crate::{evaluate_binary, evaluate_unary, lookup_operator};

fn kind(result: Result<Value, EvalError>) -> Result<Value, EvalErrorKind> {
    result.map_err(|e| e.kind)
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Add, Value::Int(i32::MAX), Value::Int(1))),
        Ok(Value::Int(i32::MIN))
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Sub, Value::UInt(0), Value::UInt(1))),
        Ok(Value::UInt(u32::MAX))
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Div, Value::Int(i32::MIN), Value::Int(-1))),
        Ok(Value::Int(i32::MIN))
    );
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Div, Value::Int(-7), Value::Int(2))),
        Ok(Value::Int(-3))
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Mod, Value::Int(-7), Value::Int(2))),
        Ok(Value::Int(-1))
    );
}

#[test]
fn zero_divisors() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Div, Value::Long(1), Value::Int(0))),
        Err(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Mod, Value::Int(1), Value::Int(0))),
        Err(EvalErrorKind::ModuloByZero)
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Div, Value::Float(1.0), Value::Float(0.0))),
        Err(EvalErrorKind::DivisionByZero)
    );
}

#[test]
fn float_modulo_is_unsupported() {
    assert!(lookup_operator(TypeTag::Float, BinaryOp::Mod).is_none());
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Mod, Value::Float(3.0), Value::Int(2))),
        Err(EvalErrorKind::UnsupportedOperator {
            op: "%",
            ty: TypeTag::Float
        })
    );
}

#[test]
fn booleans_only_compare_for_equality() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Eq, Value::Bool(true), Value::Bool(true))),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Lt, Value::Bool(false), Value::Bool(true))),
        Err(EvalErrorKind::UnsupportedOperator {
            op: "<",
            ty: TypeTag::Bool
        })
    );
}

#[test]
fn bool_widens_against_int() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Add, Value::Bool(true), Value::Int(2))),
        Ok(Value::Int(3))
    );
}

#[test]
fn mixed_comparison_widens() {
    assert_eq!(
        kind(evaluate_binary(BinaryOp::GtEq, Value::Long(3), Value::Float(2.5))),
        Ok(Value::Bool(true))
    );
}

#[test]
fn non_numeric_operands_do_not_coerce() {
    let mut heap = Heap::default();
    let Ok(s) = heap.alloc_string("x") else {
        panic!("allocation failed");
    };
    assert_eq!(
        kind(evaluate_binary(BinaryOp::Add, Value::Int(1), s)),
        Err(EvalErrorKind::OperandMismatch {
            left: TypeTag::Int,
            right: TypeTag::Str
        })
    );
}

#[test]
fn unary_negation_and_not() {
    assert_eq!(
        kind(evaluate_unary(UnaryOp::Neg, Value::Int(i32::MIN))),
        Ok(Value::Int(i32::MIN))
    );
    assert_eq!(
        kind(evaluate_unary(UnaryOp::Neg, Value::Float(1.5))),
        Ok(Value::Float(-1.5))
    );
    assert_eq!(
        kind(evaluate_unary(UnaryOp::Not, Value::Long(0))),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        kind(evaluate_unary(UnaryOp::Neg, Value::Bool(true))),
        Err(EvalErrorKind::UnsupportedOperator {
            op: "-",
            ty: TypeTag::Bool
        })
    );
}

proptest! {
    #[test]
    fn int_ops_match_wrapping_machine_arithmetic(a: i32, b: i32) {
        prop_assert_eq!(
            kind(evaluate_binary(BinaryOp::Add, Value::Int(a), Value::Int(b))),
            Ok(Value::Int(a.wrapping_add(b)))
        );
        prop_assert_eq!(
            kind(evaluate_binary(BinaryOp::Mul, Value::Int(a), Value::Int(b))),
            Ok(Value::Int(a.wrapping_mul(b)))
        );
        prop_assert_eq!(
            kind(evaluate_binary(BinaryOp::Lt, Value::Int(a), Value::Int(b))),
            Ok(Value::Bool(a < b))
        );
    }

    #[test]
    fn int_long_mix_computes_in_long(a: i32, b: i64) {
        prop_assert_eq!(
            kind(evaluate_binary(BinaryOp::Sub, Value::Int(a), Value::Long(b))),
            Ok(Value::Long(i64::from(a).wrapping_sub(b)))
        );
    }
}
