#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;
use puer_value::EvalErrorKind;

fn env_with_scope(heap: &mut Heap) -> Environment {
    let mut env = Environment::new();
    env.push(heap).unwrap();
    env
}

#[test]
fn set_then_get() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "x", Value::Int(42)).unwrap();
    assert_eq!(env.get(&heap, "x").unwrap(), Value::Int(42));
}

#[test]
fn undefined_variable_is_an_error() {
    let mut heap = Heap::default();
    let env = env_with_scope(&mut heap);
    let err = env.get(&heap, "missing").unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "missing".into()
        }
    );
}

#[test]
fn inner_scope_sees_outer_bindings() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "x", Value::Int(1)).unwrap();
    env.push(&mut heap).unwrap();
    assert_eq!(env.get(&heap, "x").unwrap(), Value::Int(1));
    assert_eq!(env.get_top(&heap, "x").unwrap(), None);
}

#[test]
fn set_binds_in_innermost_scope_only() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "x", Value::Int(1)).unwrap();
    env.push(&mut heap).unwrap();
    env.set(&mut heap, "x", Value::Int(2)).unwrap();
    assert_eq!(env.get(&heap, "x").unwrap(), Value::Int(2));
    env.pop();
    assert_eq!(env.get(&heap, "x").unwrap(), Value::Int(1));
}

#[test]
fn write_through_resolved_slot_updates_outer_binding() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "x", Value::Int(1)).unwrap();
    env.push(&mut heap).unwrap();

    let slot = env.resolve(&heap, "x").unwrap();
    Environment::write(&mut heap, &slot, Value::Int(5)).unwrap();
    env.pop();

    assert_eq!(env.get(&heap, "x").unwrap(), Value::Int(5));
}

#[test]
fn alias_forwards_reads_and_writes() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "caller", Value::Int(1)).unwrap();
    let target = env.resolve(&heap, "caller").unwrap();

    env.push(&mut heap).unwrap();
    env.set_alias(&mut heap, "param", target).unwrap();
    assert_eq!(env.get(&heap, "param").unwrap(), Value::Int(1));
    assert_eq!(env.get_top(&heap, "param").unwrap(), Some(Value::Int(1)));

    let slot = env.resolve(&heap, "param").unwrap();
    Environment::write(&mut heap, &slot, Value::Int(9)).unwrap();
    env.pop();

    assert_eq!(env.get(&heap, "caller").unwrap(), Value::Int(9));
}

#[test]
fn alias_of_alias_resolves_to_the_owner() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.set(&mut heap, "a", Value::Int(1)).unwrap();
    let owner = env.resolve(&heap, "a").unwrap();

    env.push(&mut heap).unwrap();
    env.set_alias(&mut heap, "b", owner.clone()).unwrap();
    let via_b = env.resolve(&heap, "b").unwrap();
    env.push(&mut heap).unwrap();
    env.set_alias(&mut heap, "c", via_b).unwrap();

    assert_eq!(env.resolve(&heap, "c").unwrap(), owner);
}

#[test]
fn popped_scopes_are_collected() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    env.push(&mut heap).unwrap();
    let s = heap.alloc_string("local").unwrap();
    env.set(&mut heap, "s", s).unwrap();
    assert_eq!(heap.live_count(), 3);

    env.pop();
    heap.collect_full(&env);

    assert_eq!(heap.live_count(), 1);
}

#[test]
fn pins_are_roots_until_truncated() {
    let mut heap = Heap::default();
    let mut env = env_with_scope(&mut heap);
    let mark = env.pin_mark();
    let temp = heap.alloc_string("temp").unwrap();
    env.pin(&mut heap, temp);
    env.pin(&mut heap, Value::Int(3));
    assert_eq!(env.pin_mark(), mark + 1);

    heap.collect_full(&env);
    assert_eq!(heap.live_count(), 2);

    env.truncate_pins(mark);
    heap.collect_full(&env);
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn binding_without_a_scope_is_an_error() {
    let mut heap = Heap::default();
    let mut env = Environment::new();
    assert!(env.set(&mut heap, "x", Value::Int(1)).is_err());
    assert_eq!(env.get_top(&heap, "x").unwrap(), None);
}
