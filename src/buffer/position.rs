//! Line/column coordinates and half-open ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based line/column coordinate in a [`TextBuffer`](super::TextBuffer).
///
/// `column` counts UTF-16 code units from the start of the line. Positions
/// are never validated on construction: negative or oversized values are
/// clamped by the buffer operation that consumes them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Zero-based line index.
    pub line: i64,
    /// Zero-based column in UTF-16 code units.
    pub column: i64,
}

impl Position {
    /// Create a position at `line`, `column`.
    pub const fn new(line: i64, column: i64) -> Self {
        Self { line, column }
    }

    /// The start of the buffer.
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl From<(i64, i64)> for Position {
    fn from((line, column): (i64, i64)) -> Self {
        Self::new(line, column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open `[start, end)` span between two positions.
///
/// `start` is not required to precede `end`; editing operations normalize
/// the endpoints by offset before using them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The same span with its endpoints exchanged.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

impl From<(Position, Position)> for Range {
    fn from((start, end): (Position, Position)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
