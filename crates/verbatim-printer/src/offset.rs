//! Mapping of line/column positions to byte offsets
//!
//! Lines are separated by `\n`, `\r`, `\r\n` or `\n\r`; each of these counts
//! as exactly one terminator. Columns count characters, so offsets stay on
//! UTF-8 boundaries.

use std::ops;

use verbatim_core::position::{Position, Range, is_terminator, terminator_len};
use verbatim_core::{Result, VerbatimError};

/// Precomputed line starts of one source buffer
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut at = 0;
        while at < bytes.len() {
            if is_terminator(bytes[at]) {
                at += terminator_len(bytes, at);
                line_starts.push(at);
            } else {
                at += 1;
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Number of lines, counting the (possibly empty) line after the last terminator
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the character at `position`
    pub fn offset(&self, position: Position) -> Result<usize> {
        if position.is_sentinel() {
            return Err(VerbatimError::malformed_position(
                position,
                "sentinel positions have no offset",
            ));
        }
        if position.line == 0 || position.column == 0 {
            return Err(VerbatimError::malformed_position(
                position,
                "lines and columns start at 1",
            ));
        }

        let line_start = *self
            .line_starts
            .get(position.line as usize - 1)
            .ok_or_else(|| {
                VerbatimError::malformed_position(
                    position,
                    format!("source has only {} lines", self.line_count()),
                )
            })?;

        self.source[line_start..]
            .char_indices()
            .nth(position.column as usize - 1)
            .map(|(offset, _)| line_start + offset)
            .ok_or_else(|| {
                VerbatimError::malformed_position(position, "column runs past the end of the source")
            })
    }

    /// Byte span of an inclusive range. Sentinels map to the buffer bounds.
    pub fn span(&self, range: Range) -> Result<ops::Range<usize>> {
        let start = self.bound(range.begin, false)?;
        let end = self.bound(range.end, true)?;
        if end < start {
            return Err(VerbatimError::malformed_range(range, "range ends before it begins"));
        }
        Ok(start..end)
    }

    fn bound(&self, position: Position, inclusive_end: bool) -> Result<usize> {
        if position == Position::ABSOLUTE_START {
            return Ok(0);
        }
        if position == Position::ABSOLUTE_END {
            return Ok(self.source.len());
        }
        let offset = self.offset(position)?;
        if !inclusive_end {
            return Ok(offset);
        }
        let width = self.source[offset..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        Ok(offset + width)
    }
}

/// Byte offset of `position` in `source`
pub fn resolve(source: &str, position: Position) -> Result<usize> {
    LineIndex::new(source).offset(position)
}

/// Byte span of an inclusive `range` in `source`
pub fn span_of(source: &str, range: Range) -> Result<ops::Range<usize>> {
    LineIndex::new(source).span(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, column: u32) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_first_line() {
        assert_eq!(resolve("class A {}", pos(1, 1)).unwrap(), 0);
        assert_eq!(resolve("class A {}", pos(1, 7)).unwrap(), 6);
    }

    #[test]
    fn test_each_terminator_counts_once() {
        assert_eq!(resolve("ab\ncd", pos(2, 2)).unwrap(), 4);
        assert_eq!(resolve("ab\rcd", pos(2, 2)).unwrap(), 4);
        assert_eq!(resolve("ab\r\ncd", pos(2, 2)).unwrap(), 5);
        assert_eq!(resolve("ab\n\rcd", pos(2, 2)).unwrap(), 5);
    }

    #[test]
    fn test_consecutive_terminators() {
        // `\r\n\r\n` is two terminators, `\n\n` is two, `\r\r` is two
        assert_eq!(resolve("a\r\n\r\nb", pos(3, 1)).unwrap(), 5);
        assert_eq!(resolve("a\n\nb", pos(3, 1)).unwrap(), 3);
        assert_eq!(resolve("a\r\rb", pos(3, 1)).unwrap(), 3);
    }

    #[test]
    fn test_terminator_at_end_of_buffer() {
        let index = LineIndex::new("a\r");
        assert_eq!(index.line_count(), 2);
        assert!(index.offset(pos(2, 1)).is_err());
        assert!(index.offset(pos(3, 1)).is_err());

        let index = LineIndex::new("a\n\r");
        assert_eq!(index.line_count(), 2);
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "é = 'ü';";
        assert_eq!(resolve(source, pos(1, 2)).unwrap(), 2);
        assert_eq!(
            span_of(source, Range::new(pos(1, 5), pos(1, 7))).unwrap(),
            5..9
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let err = resolve("ab\ncd", pos(3, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Malformed range 3:1: source has only 2 lines");
        assert!(resolve("ab\ncd", pos(2, 3)).is_err());
        assert!(resolve("ab", pos(0, 1)).is_err());
    }

    #[test]
    fn test_sentinels() {
        assert!(resolve("ab", Position::ABSOLUTE_START).is_err());
        assert_eq!(span_of("ab\ncd", Range::whole_buffer()).unwrap(), 0..5);
        assert_eq!(span_of("", Range::whole_buffer()).unwrap(), 0..0);
        assert_eq!(
            span_of("ab\ncd", Range::new(pos(2, 1), Position::ABSOLUTE_END)).unwrap(),
            3..5
        );
    }

    #[test]
    fn test_inverted_range() {
        assert!(span_of("abcd", Range::new(pos(1, 3), pos(1, 1))).is_err());
    }
}
