//! Evaluator configuration.

pub use puer_gc::GcConfig;

/// Default limit on nested user function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Knobs for one interpreter instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub gc: GcConfig,
    /// Nested user calls allowed before a stack-overflow error; `None`
    /// disables the check.
    pub max_call_depth: Option<usize>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            gc: GcConfig::default(),
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

impl EvalConfig {
    #[must_use]
    pub fn with_gc(mut self, gc: GcConfig) -> Self {
        self.gc = gc;
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }
}
