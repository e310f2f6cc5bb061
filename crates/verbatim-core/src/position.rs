//! Source positions and ranges
//!
//! Positions are 1-based `(line, column)` pairs where columns count characters.
//! Ranges are inclusive on both ends: `end` is the position of the last
//! character that belongs to the node.
//!
//! Line terminators are `\n`, `\r`, `\r\n` and `\n\r`; the two-character forms
//! count as a single line break. The parser and the offset resolver in
//! `verbatim-printer` both rely on [`terminator_len`] so that the positions the
//! parser assigns map back to the same bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Conceptual start of the whole buffer, before any character
    pub const ABSOLUTE_START: Position = Position { line: 0, column: 0 };

    /// Conceptual end of the whole buffer, after every character
    pub const ABSOLUTE_END: Position = Position {
        line: u32::MAX,
        column: u32::MAX,
    };

    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Whether this is one of the two whole-buffer sentinels
    pub fn is_sentinel(&self) -> bool {
        *self == Self::ABSOLUTE_START || *self == Self::ABSOLUTE_END
    }

    /// Position `n` characters to the right on the same line
    pub fn right(self, n: u32) -> Self {
        Self {
            line: self.line,
            column: self.column + n,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ABSOLUTE_START => f.write_str("START"),
            Self::ABSOLUTE_END => f.write_str("END"),
            Self { line, column } => write!(f, "{line}:{column}"),
        }
    }
}

/// Inclusive begin/end positions bounding one node's source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub begin: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// Range covering the whole buffer, expressed with the sentinels
    pub const fn whole_buffer() -> Self {
        Self {
            begin: Position::ABSOLUTE_START,
            end: Position::ABSOLUTE_END,
        }
    }

    /// Range spanning from the start of `self` to the end of `other`
    pub fn cover(self, other: Range) -> Self {
        Self {
            begin: self.begin,
            end: other.end,
        }
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains(&self, other: &Range) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}

/// Length in bytes of the line terminator starting at `at`.
///
/// `bytes[at]` must be `\r` or `\n`. `\r\n` and `\n\r` are one terminator;
/// a lone `\r` or `\n` (including one at the very end of the buffer) is one
/// byte long.
pub fn terminator_len(bytes: &[u8], at: usize) -> usize {
    match (bytes[at], bytes.get(at + 1)) {
        (b'\r', Some(b'\n')) | (b'\n', Some(b'\r')) => 2,
        _ => 1,
    }
}

/// Whether `byte` starts a line terminator
pub fn is_terminator(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}
