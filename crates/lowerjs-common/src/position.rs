//! Line/column positions for diagnostics.
//!
//! Nodes produced by the parser carry a `SourceRange`; nodes synthesized by a
//! lowering pass carry none.

use serde::Serialize;
use std::fmt;

/// A position in a source file (0-indexed line and column).
///
/// Ordering is source order: by line, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Displayed 1-based
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub const fn new(start: Position, end: Position) -> Self {
        SourceRange { start, end }
    }

    /// A range covering `len` columns on a single line.
    pub const fn on_line(line: u32, column: u32, len: u32) -> Self {
        SourceRange {
            start: Position::new(line, column),
            end: Position::new(line, column + len),
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}
