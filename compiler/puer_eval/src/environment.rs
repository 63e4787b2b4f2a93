//! Variable environment.
//!
//! A stack of heap-allocated scopes, each linked to the one below it. The
//! head of the stack is the collector's root: everything a program can name
//! is reachable from it.
//!
//! Lookup walks from the innermost scope outward. Declarations ([`set`])
//! always bind in the innermost scope. Writes to an existing variable go
//! through [`resolve`], which yields the storage location the name refers to,
//! so assignment never creates a shadowing binding.
//!
//! Record parameters are bound with [`set_alias`]: the callee's entry stores
//! no value and forwards every read and write to the caller's variable.
//!
//! Besides the scope stack the environment holds *pinned temporaries*:
//! reference values the evaluator is holding mid-statement (an operand
//! waiting for the other side of a binary operator, evaluated arguments,
//! a record being indexed). They are roots until the enclosing statement
//! finishes.
//!
//! [`set`]: Environment::set
//! [`resolve`]: Environment::resolve
//! [`set_alias`]: Environment::set_alias

use puer_gc::{GcRef, Trace, Tracer};
use puer_value::errors::{malformed_node, undefined_variable, EvalError};
use puer_value::{Heap, Value, VarEntry};

/// The storage behind a variable name: entry `name` of `scope`.
///
/// Always refers to an owned entry; aliases are followed while resolving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub scope: GcRef,
    pub name: String,
}

/// Scope stack plus pinned temporaries.
#[derive(Debug, Default)]
pub struct Environment {
    scopes: Vec<GcRef>,
    pins: Vec<Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Innermost scope.
    #[inline]
    pub fn head(&self) -> Option<GcRef> {
        self.scopes.last().copied()
    }

    /// Number of scopes on the stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a fresh, empty scope.
    pub fn push(&mut self, heap: &mut Heap) -> Result<(), EvalError> {
        let scope = heap.alloc_scope(self.head())?;
        self.scopes.push(scope);
        Ok(())
    }

    /// Pop the innermost scope. Its bindings become garbage unless something
    /// else still reaches them.
    pub fn pop(&mut self) -> Option<GcRef> {
        self.scopes.pop()
    }

    /// Find the storage `name` refers to, innermost scope first.
    pub fn lookup(&self, heap: &Heap, name: &str) -> Result<Option<Slot>, EvalError> {
        let mut cursor = self.head();
        while let Some(scope_ref) = cursor {
            let scope = heap.scope(scope_ref)?;
            match scope.vars.get(name) {
                Some(VarEntry::Owned(_)) => {
                    return Ok(Some(Slot {
                        scope: scope_ref,
                        name: name.to_string(),
                    }))
                }
                Some(VarEntry::Alias { scope, name }) => {
                    return Ok(Some(Slot {
                        scope: *scope,
                        name: name.clone(),
                    }))
                }
                None => cursor = scope.parent,
            }
        }
        Ok(None)
    }

    /// Like [`lookup`](Self::lookup), but an unbound name is an error.
    pub fn resolve(&self, heap: &Heap, name: &str) -> Result<Slot, EvalError> {
        self.lookup(heap, name)?
            .ok_or_else(|| undefined_variable(name))
    }

    /// Value of `name`.
    pub fn get(&self, heap: &Heap, name: &str) -> Result<Value, EvalError> {
        let slot = self.resolve(heap, name)?;
        Self::read(heap, &slot)
    }

    /// Value of `name` if it is bound in the innermost scope itself.
    pub fn get_top(&self, heap: &Heap, name: &str) -> Result<Option<Value>, EvalError> {
        let Some(head) = self.head() else {
            return Ok(None);
        };
        match heap.scope(head)?.vars.get(name) {
            None => Ok(None),
            Some(VarEntry::Owned(v)) => Ok(Some(*v)),
            Some(VarEntry::Alias { scope, name }) => Self::read(
                heap,
                &Slot {
                    scope: *scope,
                    name: name.clone(),
                },
            )
            .map(Some),
        }
    }

    /// Bind `name` in the innermost scope, replacing any binding it had there.
    pub fn set(&mut self, heap: &mut Heap, name: &str, value: Value) -> Result<(), EvalError> {
        let head = self.require_head()?;
        heap.scope_mut(head)?
            .vars
            .insert(name.to_string(), VarEntry::Owned(value));
        heap.shade_value(value);
        Ok(())
    }

    /// Bind `name` in the innermost scope as a reference to `target`.
    pub fn set_alias(&mut self, heap: &mut Heap, name: &str, target: Slot) -> Result<(), EvalError> {
        let head = self.require_head()?;
        let scope = target.scope;
        heap.scope_mut(head)?.vars.insert(
            name.to_string(),
            VarEntry::Alias {
                scope,
                name: target.name,
            },
        );
        heap.shade(scope);
        Ok(())
    }

    /// Read the value stored at `slot`.
    pub fn read(heap: &Heap, slot: &Slot) -> Result<Value, EvalError> {
        match heap.scope(slot.scope)?.vars.get(&slot.name) {
            Some(VarEntry::Owned(v)) => Ok(*v),
            Some(VarEntry::Alias { .. }) => Err(malformed_node(format!(
                "alias chain through '{}'",
                slot.name
            ))),
            None => Err(undefined_variable(&slot.name)),
        }
    }

    /// Overwrite the value stored at `slot`.
    pub fn write(heap: &mut Heap, slot: &Slot, value: Value) -> Result<(), EvalError> {
        match heap.scope_mut(slot.scope)?.vars.get_mut(&slot.name) {
            Some(VarEntry::Owned(v)) => *v = value,
            Some(VarEntry::Alias { .. }) => {
                return Err(malformed_node(format!(
                    "alias chain through '{}'",
                    slot.name
                )))
            }
            None => return Err(undefined_variable(&slot.name)),
        }
        heap.shade_value(value);
        Ok(())
    }

    /// Keep `value` alive until the pins are truncated below it.
    pub fn pin(&mut self, heap: &mut Heap, value: Value) {
        if value.gc_ref().is_some() {
            heap.shade_value(value);
            self.pins.push(value);
        }
    }

    /// Current pin height, to hand back to [`truncate_pins`](Self::truncate_pins).
    #[inline]
    pub fn pin_mark(&self) -> usize {
        self.pins.len()
    }

    pub fn truncate_pins(&mut self, mark: usize) {
        self.pins.truncate(mark);
    }

    /// Drop every scope and pin.
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.pins.clear();
    }

    fn require_head(&self) -> Result<GcRef, EvalError> {
        self.head()
            .ok_or_else(|| malformed_node("binding outside any scope"))
    }
}

impl Trace for Environment {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        // Outer scopes are reached through the parent links.
        tracer.mark_opt(self.head());
        self.pins.trace(tracer);
    }
}

#[cfg(test)]
mod tests;
