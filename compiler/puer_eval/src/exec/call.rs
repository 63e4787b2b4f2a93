//! Function calls.
//!
//! Builtins are looked up first, then user functions. A user call:
//!
//! 1. evaluates its arguments in the caller's scope
//! 2. pushes a scope on top of the caller's (scoping is dynamic)
//! 3. binds parameters: record parameters alias the caller's variable,
//!    everything else is bound by value, with strings and arrays copied
//! 4. runs the body and checks the returned value against the declared type
//! 5. copies a string or array result before the callee's scope goes away

use puer_ir::{FuncDef, Node, NodeKind, TypeTag};
use puer_value::errors::{
    arity_mismatch, redeclaration, reference_argument, stack_overflow, type_mismatch,
    undefined_function, EvalError,
};
use puer_value::{implicit_convert, EvalResult, Value};
use smallvec::SmallVec;
use tracing::trace;

use crate::exec::ControlSignal;
use crate::functions::BuiltinFn;
use crate::{Environment, Interpreter, Slot};

/// How one parameter gets bound in the callee's scope.
enum Binding {
    Value(Value),
    Alias(Slot),
}

impl<'a> Interpreter<'a> {
    pub(crate) fn eval_call(&mut self, name: &str, args: &'a [Node]) -> EvalResult {
        if let Some(builtin) = self.builtins.get(name) {
            let func = builtin.func;
            let params = builtin.params.clone();
            let ret = builtin.ret;
            return self.call_builtin(name, func, &params, ret, args);
        }
        let def = self
            .functions
            .get(name)
            .ok_or_else(|| undefined_function(name))?;
        self.call_function(def, args)
    }

    fn call_builtin(
        &mut self,
        name: &str,
        func: BuiltinFn,
        params: &[TypeTag],
        ret: TypeTag,
        args: &'a [Node],
    ) -> EvalResult {
        if args.len() != params.len() {
            return Err(arity_mismatch(name, params.len(), args.len()));
        }
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len());
        for (i, (arg, ty)) in args.iter().zip(params).enumerate() {
            let value = self.eval_expr(arg)?;
            if *ty != TypeTag::Any && value.type_tag() != *ty {
                return Err(type_mismatch(
                    format!("argument {} of '{name}'", i + 1),
                    *ty,
                    value.type_tag(),
                )
                .or_at(arg.pos));
            }
            values.push(value);
        }
        trace!(builtin = name, "builtin call");
        let result = func(self, &values)?;
        if ret != TypeTag::Any && result.type_tag() != ret {
            return Err(type_mismatch(
                format!("return value of '{name}'"),
                ret,
                result.type_tag(),
            ));
        }
        Ok(result)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = %def.name, args = args.len(), depth = self.call_depth)
    )]
    fn call_function(&mut self, def: &'a FuncDef, args: &'a [Node]) -> EvalResult {
        if args.len() != def.params.len() {
            return Err(arity_mismatch(&def.name, def.params.len(), args.len()));
        }
        if let Some(limit) = self.config.max_call_depth {
            if self.call_depth >= limit {
                return Err(stack_overflow(limit));
            }
        }

        let mut bindings = Vec::with_capacity(args.len());
        for (i, (param, arg)) in def.params.iter().zip(args).enumerate() {
            let context = || format!("argument {} of '{}'", i + 1, def.name);
            if param.ty == TypeTag::Record {
                let NodeKind::Var(var) = &arg.kind else {
                    return Err(reference_argument(&param.name).or_at(arg.pos));
                };
                let slot = self
                    .env
                    .resolve(&self.heap, var)
                    .map_err(|e| e.or_at(arg.pos))?;
                let current = Environment::read(&self.heap, &slot)?;
                self.check_record(current, param.record.as_deref(), context)
                    .map_err(|e| e.or_at(arg.pos))?;
                bindings.push(Binding::Alias(slot));
            } else {
                let value = self.eval_expr(arg)?;
                let value = implicit_convert(value, param.ty).ok_or_else(|| {
                    type_mismatch(context(), param.ty, value.type_tag()).or_at(arg.pos)
                })?;
                let value = self.copy_on_transfer(value)?;
                bindings.push(Binding::Value(value));
            }
        }

        self.call_depth += 1;
        let result = self.run_function(def, bindings);
        self.call_depth -= 1;
        let value = result?;
        self.pin(value);
        Ok(value)
    }

    /// Bind parameters in a fresh scope and run the body.
    fn run_function(&mut self, def: &'a FuncDef, bindings: Vec<Binding>) -> EvalResult {
        let mut scoped = self.scoped()?;
        for (param, binding) in def.params.iter().zip(bindings) {
            if scoped.env.get_top(&scoped.heap, &param.name)?.is_some() {
                return Err(redeclaration(&param.name));
            }
            match binding {
                Binding::Value(value) => scoped.declare(&param.name, value)?,
                Binding::Alias(slot) => scoped.declare_alias(&param.name, slot)?,
            }
        }

        scoped.ret_val = Value::Void;
        if scoped.eval_stmt(&def.body)? != ControlSignal::Return {
            scoped.ret_val = Value::Void;
        }
        let value = scoped.ret_val;
        let context = || format!("return value of '{}'", def.name);
        let value = if def.ret == TypeTag::Record {
            scoped.check_record(value, None, context)?;
            value
        } else {
            implicit_convert(value, def.ret)
                .ok_or_else(|| type_mismatch(context(), def.ret, value.type_tag()))?
        };
        scoped.copy_on_transfer(value)
    }

    /// Strings and arrays cross a call boundary by copy.
    fn copy_on_transfer(&mut self, value: Value) -> EvalResult {
        match value {
            Value::Str(_) | Value::Array(_) => {
                let copy = self.heap.clone_value(value)?;
                self.pin(copy);
                Ok(copy)
            }
            other => Ok(other),
        }
    }

    fn declare_alias(&mut self, name: &str, target: Slot) -> Result<(), EvalError> {
        self.env.set_alias(&mut self.heap, name, target)
    }
}
