//! The tree-walking interpreter.
//!
//! An [`Interpreter`] owns the heap, the environment, the record schemas and
//! the function tables for one program run. Evaluation itself lives in
//! `crate::exec`; this module holds the state, its lifecycle, and the glue to
//! the collector.
//!
//! # Roots
//!
//! Every incremental collection step traces:
//! - the environment (innermost scope plus pinned temporaries)
//! - the record registry (default field values)
//! - the return-value slot
//!
//! Steps only run between statements, so a value is safe as long as it is
//! bound, pinned, or sitting in the return slot at a statement boundary.

mod builder;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use puer_gc::{Trace, Tracer};
use puer_ir::{Node, TypeTag};
use puer_value::{EvalError, EvalResult, Heap, RecordRegistry, Value};
use tracing::{debug, info};

use crate::functions::{BuiltinFn, BuiltinRegistry, FunctionTable};
use crate::{EvalConfig, Environment, SharedPrintHandler};

/// Interpreter state for one program.
///
/// `'a` is the lifetime of the program tree: function definitions are
/// borrowed from it rather than copied.
pub struct Interpreter<'a> {
    pub(crate) heap: Heap,
    pub(crate) env: Environment,
    pub(crate) records: RecordRegistry,
    pub(crate) functions: FunctionTable<'a>,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) config: EvalConfig,
    /// Value carried by the most recent `return`.
    pub(crate) ret_val: Value,
    /// Nested user calls currently active.
    pub(crate) call_depth: usize,
}

/// Everything the collector must treat as live.
struct Roots<'r> {
    env: &'r Environment,
    records: &'r RecordRegistry,
    ret_val: Value,
}

impl Trace for Roots<'_> {
    fn trace(&self, tracer: &mut Tracer<'_>) {
        self.env.trace(tracer);
        self.records.trace(tracer);
        self.ret_val.trace(tracer);
    }
}

impl<'a> Interpreter<'a> {
    /// Interpreter with default configuration, printing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Execute `program` from its root node.
    ///
    /// The global scope is created on the first run and kept afterwards, so
    /// several programs can be run against the same state. A `break`,
    /// `continue` or `return` reaching the top level ends the run.
    pub fn run(&mut self, program: &'a Node) -> Result<(), EvalError> {
        if self.env.depth() == 0 {
            self.env.push(&mut self.heap)?;
        }
        let signal = self.eval_stmt(program)?;
        if !signal.is_none() {
            debug!(?signal, "control signal ended the program");
        }
        Ok(())
    }

    /// Drop every scope, schema, function, builtin and pinned value, then
    /// collect.
    ///
    /// Afterwards the heap is empty. Returns the number of objects freed.
    pub fn teardown(&mut self) -> u64 {
        self.env.clear();
        self.records.clear();
        self.functions.clear();
        self.builtins.clear();
        self.ret_val = Value::Void;
        self.call_depth = 0;
        let freed = self.collect_garbage();
        info!(freed, live = self.heap.live_count(), "interpreter torn down");
        freed
    }

    /// Run a complete collection cycle now. Returns the number of objects
    /// freed.
    pub fn collect_garbage(&mut self) -> u64 {
        let roots = Roots {
            env: &self.env,
            records: &self.records,
            ret_val: self.ret_val,
        };
        self.heap.collect_full(&roots)
    }

    /// One incremental collection step; `false` when it finished a cycle.
    pub(crate) fn gc_step(&mut self) -> bool {
        let roots = Roots {
            env: &self.env,
            records: &self.records,
            ret_val: self.ret_val,
        };
        self.heap.collect_step(&roots)
    }

    /// Register a builtin. Returns `false` if the name is already taken.
    pub fn register_builtin(
        &mut self,
        name: &str,
        func: BuiltinFn,
        params: &[TypeTag],
        ret: TypeTag,
    ) -> bool {
        self.builtins.register(name, func, params, ret)
    }

    /// Value of a variable visible from the current scope.
    pub fn get_var(&self, name: &str) -> EvalResult {
        self.env.get(&self.heap, name)
    }

    /// Bind `name` in the innermost scope.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        self.env.set(&mut self.heap, name, value)
    }

    /// Render a value the way `print` does.
    pub fn format_value(&self, value: Value) -> Result<String, EvalError> {
        self.heap.format_value(value, &self.records)
    }

    /// Keep a reference value alive until the current statement ends.
    #[inline]
    pub(crate) fn pin(&mut self, value: Value) {
        self.env.pin(&mut self.heap, value);
    }

    /// Store into the return slot.
    pub(crate) fn set_return(&mut self, value: Value) {
        self.heap.shade_value(value);
        self.ret_val = value;
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn records(&self) -> &RecordRegistry {
        &self.records
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Output captured so far, if printing to a buffer.
    pub fn output(&self) -> String {
        self.print_handler.output()
    }
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
