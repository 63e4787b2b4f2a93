//! User function and builtin tables.

use std::fmt;

use puer_ir::{FuncDef, Name, TypeTag};
use puer_value::errors::{duplicate_function, EvalError};
use puer_value::EvalResult;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::Interpreter;
use puer_value::Value;

/// Native implementation of a builtin.
///
/// Arguments have already been checked against the registered signature.
pub type BuiltinFn = fn(&mut Interpreter<'_>, &[Value]) -> EvalResult;

/// A registered builtin and its signature.
#[derive(Clone)]
pub struct Builtin {
    pub func: BuiltinFn,
    /// Parameter types; [`TypeTag::Any`] accepts every value.
    pub params: SmallVec<[TypeTag; 4]>,
    /// Return type; [`TypeTag::Any`] accepts every value.
    pub ret: TypeTag,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish_non_exhaustive()
    }
}

/// Builtins by name. Consulted before user functions on every call.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    table: FxHashMap<Name, Builtin>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Returns `false`, leaving the existing entry in place,
    /// if the name is already taken.
    pub fn register(
        &mut self,
        name: &str,
        func: BuiltinFn,
        params: &[TypeTag],
        ret: TypeTag,
    ) -> bool {
        if self.table.contains_key(name) {
            warn!(builtin = name, "duplicate builtin registration rejected");
            eprintln!("Builtin function '{name}' is already registered.");
            return false;
        }
        debug!(builtin = name, arity = params.len(), %ret, "builtin registered");
        self.table.insert(
            name.to_string(),
            Builtin {
                func,
                params: SmallVec::from_slice(params),
                ret,
            },
        );
        true
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

/// User functions by name, borrowed from the program tree.
#[derive(Debug, Default)]
pub struct FunctionTable<'a> {
    defs: FxHashMap<Name, &'a FuncDef>,
}

impl<'a> FunctionTable<'a> {
    pub fn new() -> Self {
        FunctionTable {
            defs: FxHashMap::default(),
        }
    }

    pub fn define(&mut self, def: &'a FuncDef) -> Result<(), EvalError> {
        if self.defs.contains_key(&def.name) {
            return Err(duplicate_function(&def.name));
        }
        debug!(function = %def.name, params = def.params.len(), "function defined");
        self.defs.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'a FuncDef> {
        self.defs.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puer_ir::build;

    fn noop(_: &mut Interpreter<'_>, _: &[Value]) -> EvalResult {
        Ok(Value::Void)
    }

    #[test]
    fn duplicate_builtin_is_rejected() {
        let mut reg = BuiltinRegistry::new();
        assert!(reg.register("f", noop, &[TypeTag::Int], TypeTag::Void));
        assert!(!reg.register("f", noop, &[], TypeTag::Int));
        let kept = reg.get("f").map(|b| (b.params.len(), b.ret));
        assert_eq!(kept, Some((1, TypeTag::Void)));
    }

    #[test]
    fn duplicate_function_is_an_error() {
        let node = build::func_def("f", vec![], TypeTag::Void, build::block(vec![]));
        let puer_ir::NodeKind::FuncDef(def) = &node.kind else {
            panic!("expected a function definition");
        };
        let mut table = FunctionTable::new();
        assert!(table.define(def).is_ok());
        assert!(table.define(def).is_err());
        assert_eq!(table.len(), 1);
        assert!(table.get("f").is_some());
    }
}
