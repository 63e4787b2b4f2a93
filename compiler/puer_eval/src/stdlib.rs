//! Standard builtins.
//!
//! | name         | params          | returns |
//! |--------------|-----------------|---------|
//! | `len`        | `any`           | `int`   |
//! | `append`     | `any`, `any`    | `void`  |
//! | `abs`        | `int`           | `int`   |
//! | `gc_collect` |                 | `void`  |

use puer_ir::TypeTag;
use puer_value::errors::{malformed_node, type_mismatch};
use puer_value::{implicit_convert, EvalResult, Value};
use tracing::debug;

use crate::functions::BuiltinRegistry;
use crate::Interpreter;

/// Register every standard builtin in `registry`.
pub fn register_stdlib(registry: &mut BuiltinRegistry) {
    registry.register("len", builtin_len, &[TypeTag::Any], TypeTag::Int);
    registry.register(
        "append",
        builtin_append,
        &[TypeTag::Any, TypeTag::Any],
        TypeTag::Void,
    );
    registry.register("abs", builtin_abs, &[TypeTag::Int], TypeTag::Int);
    registry.register("gc_collect", builtin_gc_collect, &[], TypeTag::Void);
}

/// Element count of an array, or byte length of a string.
fn builtin_len(interp: &mut Interpreter<'_>, args: &[Value]) -> EvalResult {
    let len = match args {
        [Value::Array(r)] => interp.heap.array(*r)?.len(),
        [Value::Str(r)] => interp.heap.string(*r)?.len(),
        [other] => {
            return Err(type_mismatch(
                "argument 1 of 'len'",
                TypeTag::Array,
                other.type_tag(),
            ))
        }
        _ => return Err(malformed_node("len called with the wrong argument count")),
    };
    Ok(Value::Int(len as i32))
}

/// Push `item` onto the end of `array`. The item must fit the element type.
fn builtin_append(interp: &mut Interpreter<'_>, args: &[Value]) -> EvalResult {
    let [target, item] = args else {
        return Err(malformed_node("append called with the wrong argument count"));
    };
    let Value::Array(r) = *target else {
        return Err(type_mismatch(
            "argument 1 of 'append'",
            TypeTag::Array,
            target.type_tag(),
        ));
    };
    let array = interp.heap.array(r)?;
    let elem = array.elem;
    let first = array.items.first().copied();
    let item = implicit_convert(*item, elem)
        .ok_or_else(|| type_mismatch("argument 2 of 'append'", elem, item.type_tag()))?;
    if let (Some(Value::Array(first)), Value::Array(row)) = (first, item) {
        if let Some((expected, got)) = interp.heap.array_shape_mismatch(first, row)? {
            return Err(type_mismatch("argument 2 of 'append'", expected, got));
        }
    }
    interp.heap.array_mut(r)?.items.push(item);
    interp.heap.shade_value(item);
    Ok(Value::Void)
}

fn builtin_abs(_: &mut Interpreter<'_>, args: &[Value]) -> EvalResult {
    match args {
        [Value::Int(v)] => Ok(Value::Int(v.wrapping_abs())),
        [other] => Err(type_mismatch("argument 1 of 'abs'", TypeTag::Int, other.type_tag())),
        _ => Err(malformed_node("abs called with the wrong argument count")),
    }
}

/// Force a complete collection cycle.
fn builtin_gc_collect(interp: &mut Interpreter<'_>, _: &[Value]) -> EvalResult {
    let freed = interp.collect_garbage();
    debug!(freed, live = interp.heap.live_count(), "gc_collect");
    Ok(Value::Void)
}
