//! How control leaves a statement.

/// Outcome of evaluating a statement.
///
/// Loops consume `Break` and `Continue`; a function call consumes `Return`,
/// whose value is in the interpreter's return slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ControlSignal {
    /// Fell through normally.
    #[default]
    None,
    Break,
    Continue,
    Return,
}

impl ControlSignal {
    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, ControlSignal::None)
    }
}
