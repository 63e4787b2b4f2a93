use thiserror::Error;

/// Allocation failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GcError {
    /// Every slot index is in use.
    #[error("out of memory: heap slot space exhausted")]
    OutOfMemory,
}
