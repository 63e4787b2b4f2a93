//! Source positions.

use std::fmt;

/// Line/column position of a node in the source program.
///
/// Both coordinates are 1-based. [`Position::DUMMY`] (0, 0) marks nodes that
/// were synthesized rather than parsed; diagnostics omit it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position for generated nodes.
    pub const DUMMY: Position = Position { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Returns `true` if this position came from real source text.
    #[inline]
    pub const fn is_known(self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_is_unknown() {
        assert!(!Position::DUMMY.is_known());
        assert!(Position::new(3, 1).is_known());
    }

    #[test]
    fn display_names_line_and_column() {
        assert_eq!(Position::new(12, 7).to_string(), "line 12, column 7");
    }
}
