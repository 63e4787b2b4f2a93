//! RAII scope guard for the interpreter's environment.
//!
//! [`ScopedInterpreter`] pushes a scope on creation and pops it on drop, so
//! every exit path out of a block, loop or call (including `?` and
//! `return`) restores the scope stack. It derefs to [`Interpreter`], letting
//! callers evaluate through the guard as if it were the interpreter.
//!
//! ```text
//! let mut scoped = self.scoped()?;
//! scoped.declare(name, value)?;
//! scoped.eval_stmt(body)?;
//! // scope popped here
//! ```

use std::ops::{Deref, DerefMut};

use puer_value::EvalError;

use super::Interpreter;

/// Guard that pops the innermost scope when dropped.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        // Popping only shrinks the stack; the scope object is left for the
        // collector.
        self.interpreter.env.pop();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope and return a guard that pops it.
    ///
    /// Fails only if the scope object cannot be allocated, in which case
    /// nothing was pushed.
    pub(crate) fn scoped(&mut self) -> Result<ScopedInterpreter<'_, 'a>, EvalError> {
        self.env.push(&mut self.heap)?;
        Ok(ScopedInterpreter { interpreter: self })
    }
}
