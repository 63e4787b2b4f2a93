//! `InterpreterBuilder` for configuring interpreter instances.

use puer_value::{GcConfig, Heap, RecordRegistry, Value};

use super::Interpreter;
use crate::functions::{BuiltinRegistry, FunctionTable};
use crate::{register_stdlib, stdout_handler, EvalConfig, Environment, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Defaults: output to stdout, the standard builtins registered, and
/// [`EvalConfig::default`].
pub struct InterpreterBuilder {
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
    stdlib: bool,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder {
            config: EvalConfig::default(),
            print_handler: None,
            stdlib: true,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn gc_config(mut self, gc: GcConfig) -> Self {
        self.config.gc = gc;
        self
    }

    /// Limit on nested user calls; `None` removes it.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Where `print` and `println` write. Pass a buffer handler to capture
    /// output.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Whether to register the standard builtins (`len`, `append`, `abs`,
    /// `gc_collect`).
    #[must_use]
    pub fn with_stdlib(mut self, enabled: bool) -> Self {
        self.stdlib = enabled;
        self
    }

    pub fn build<'a>(self) -> Interpreter<'a> {
        let mut builtins = BuiltinRegistry::new();
        if self.stdlib {
            register_stdlib(&mut builtins);
        }
        Interpreter {
            heap: Heap::new(self.config.gc),
            env: Environment::new(),
            records: RecordRegistry::new(),
            functions: FunctionTable::new(),
            builtins,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config: self.config,
            ret_val: Value::Void,
            call_depth: 0,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
