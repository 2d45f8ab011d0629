//! Byte buffer with an eagerly rebuilt line table.
//!
//! # Overview
//!
//! [`TextBuffer`] stores raw bytes plus the fixed newline sequence of the document. The line
//! table partitions the whole content, in order, into [`Line`] ranges that exclude the newline
//! sequence; the last line never has a newline after it, and an empty buffer has exactly one
//! empty line.
//!
//! Every successful [`TextBuffer::edit`] rebuilds the table from scratch and returns a
//! [`BufferEdit`] describing the replaced range in both byte offsets and byte-based
//! [`Position`]s, which is what an incremental parser needs to stay in sync.
//!
//! # Example
//!
//! ```rust
//! use modal_core::{LineEnding, Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::new("hello", LineEnding::Lf);
//! let edit = buffer.edit(5, 5, b"\nworld").unwrap();
//!
//! assert_eq!(buffer.line_count(), 2);
//! assert_eq!(edit.new_end_point, Position::new(1, 5));
//! assert_eq!(buffer.index_from_rune_coord(Position::new(1, 0)).unwrap(), 6);
//! ```

use std::borrow::Cow;
use std::ops::Range;

use thiserror::Error;
use tracing::trace;

use crate::line_ending::LineEnding;
use crate::text::{rune_count, rune_offset};

/// Errors raised by buffer indexing and editing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// An edit or lookup range falls outside the content.
    #[error("index out of bounds: {start}..{end} (len {len})")]
    IndexOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Content length at the time of the call.
        len: usize,
    },
    /// A row does not exist.
    #[error("line {row} out of range (line count {line_count})")]
    LineOutOfRange {
        /// Requested row.
        row: usize,
        /// Number of lines in the buffer.
        line_count: usize,
    },
    /// A coordinate cannot be resolved.
    #[error("coordinate out of range: row {row}, col {col}")]
    CoordOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

/// A zero-based (row, column) coordinate.
///
/// Depending on the call the column counts bytes or code points. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line index.
    pub row: usize,
    /// Column within the line.
    pub col: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A half-open byte range of one line, excluding its newline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    /// First byte of the line.
    pub start: usize,
    /// One past the last content byte (the newline sequence begins here).
    pub end: usize,
}

impl Line {
    /// Length in bytes, newline excluded.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the line has no content.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The line as a byte range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Description of one successful [`TextBuffer::edit`].
///
/// Points are byte-based (row, byte column), matching what incremental parsers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferEdit {
    /// Start of the replaced range.
    pub start: usize,
    /// End of the replaced range before the edit.
    pub old_end: usize,
    /// End of the replacement after the edit.
    pub new_end: usize,
    /// `start` as a point.
    pub start_point: Position,
    /// `old_end` as a point in the old content.
    pub old_end_point: Position,
    /// `new_end` as a point in the new content.
    pub new_end_point: Position,
}

impl BufferEdit {
    /// Number of bytes removed.
    pub fn removed_len(&self) -> usize {
        self.old_end - self.start
    }

    /// Number of bytes inserted.
    pub fn replacement_len(&self) -> usize {
        self.new_end - self.start
    }
}

/// Raw byte content with a newline sequence and a line table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    content: Vec<u8>,
    newline: LineEnding,
    lines: Vec<Line>,
    version: u64,
}

impl TextBuffer {
    /// Create a buffer from content and an explicit newline sequence.
    pub fn new(content: impl Into<Vec<u8>>, newline: LineEnding) -> Self {
        let content = content.into();
        let lines = build_lines(&content, newline);
        Self {
            content,
            newline,
            lines,
            version: 0,
        }
    }

    /// Create a buffer detecting the newline sequence from the content.
    ///
    /// `fallback` is used when the content contains no line break.
    pub fn from_bytes(content: impl Into<Vec<u8>>, fallback: LineEnding) -> Self {
        let content = content.into();
        let newline = LineEnding::detect_or(&content, fallback);
        Self::new(content, newline)
    }

    /// An empty buffer with a single empty line.
    pub fn empty(newline: LineEnding) -> Self {
        Self::new(Vec::new(), newline)
    }

    /// Raw content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded for display, invalid bytes replaced.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// The newline sequence.
    pub fn newline(&self) -> LineEnding {
        self.newline
    }

    /// The line table.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines (at least one).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Edit counter, bumped on every successful edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Line `row`, if it exists.
    pub fn line(&self, row: usize) -> Option<Line> {
        self.lines.get(row).copied()
    }

    /// Start of the line after `row`, or the content length for the last line.
    pub fn next_line_start(&self, row: usize) -> usize {
        self.lines
            .get(row + 1)
            .map_or(self.content.len(), |line| line.start)
    }

    /// Bytes of line `row`, newline excluded.
    pub fn line_bytes(&self, row: usize) -> Result<&[u8], BufferError> {
        let line = self.check_row(row)?;
        Ok(&self.content[line.range()])
    }

    /// Bytes in `range`.
    pub fn slice(&self, range: Range<usize>) -> Result<&[u8], BufferError> {
        if range.start > range.end || range.end > self.content.len() {
            return Err(self.out_of_bounds(range.start, range.end));
        }
        Ok(&self.content[range])
    }

    /// Width of line `row` in code points.
    pub fn line_width(&self, row: usize) -> Result<usize, BufferError> {
        self.line_bytes(row).map(rune_count)
    }

    /// Ensure `index` lies in `[0, len]`.
    pub fn check_index(&self, index: usize) -> Result<(), BufferError> {
        if index > self.content.len() {
            return Err(self.out_of_bounds(index, index));
        }
        Ok(())
    }

    /// Ensure `row` exists and return its line.
    pub fn check_row(&self, row: usize) -> Result<Line, BufferError> {
        self.line(row).ok_or(BufferError::LineOutOfRange {
            row,
            line_count: self.lines.len(),
        })
    }

    /// Row containing `index`.
    ///
    /// Indices inside a newline sequence belong to the line before it; indices past the end
    /// resolve to the last line.
    pub fn row(&self, index: usize) -> usize {
        self.lines
            .partition_point(|line| line.start <= index)
            .saturating_sub(1)
    }

    /// Byte-based coordinate of `index`.
    pub fn coord(&self, index: usize) -> Result<Position, BufferError> {
        self.check_index(index)?;
        let row = self.row(index);
        Ok(Position::new(row, index - self.lines[row].start))
    }

    /// Code-point-based coordinate of `index`.
    ///
    /// An index on a line end maps to a column equal to the line width.
    pub fn rune_coord(&self, index: usize) -> Result<Position, BufferError> {
        self.check_index(index)?;
        let row = self.row(index);
        let line = self.lines[row];
        let col = rune_count(&self.content[line.start..index.min(line.end)]);
        Ok(Position::new(row, col))
    }

    /// Byte index of a code-point-based coordinate.
    ///
    /// A column beyond the line width resolves to the start of the next line, or to the content
    /// length on the last line.
    pub fn index_from_rune_coord(&self, pos: Position) -> Result<usize, BufferError> {
        let line = self.line(pos.row).ok_or(BufferError::CoordOutOfRange {
            row: pos.row,
            col: pos.col,
        })?;
        Ok(match rune_offset(&self.content[line.range()], pos.col) {
            Some(offset) => line.start + offset,
            None => self.next_line_start(pos.row),
        })
    }

    /// Replace `start..end` with `replacement` and rebuild the line table.
    ///
    /// Out-of-range bounds are rejected, never clamped.
    pub fn edit(
        &mut self,
        start: usize,
        end: usize,
        replacement: &[u8],
    ) -> Result<BufferEdit, BufferError> {
        if start > end || end > self.content.len() {
            return Err(self.out_of_bounds(start, end));
        }
        let start_point = self.coord(start)?;
        let old_end_point = self.coord(end)?;

        self.content.splice(start..end, replacement.iter().copied());
        self.lines = build_lines(&self.content, self.newline);
        self.version += 1;

        let new_end = start + replacement.len();
        let new_end_point = self.coord(new_end)?;
        trace!(
            start,
            old_end = end,
            new_end,
            version = self.version,
            "buffer edited"
        );

        Ok(BufferEdit {
            start,
            old_end: end,
            new_end,
            start_point,
            old_end_point,
            new_end_point,
        })
    }

    /// Insert `bytes` at `index`.
    pub fn insert(&mut self, index: usize, bytes: &[u8]) -> Result<BufferEdit, BufferError> {
        self.edit(index, index, bytes)
    }

    /// Remove `start..end`.
    pub fn erase(&mut self, start: usize, end: usize) -> Result<BufferEdit, BufferError> {
        self.edit(start, end, &[])
    }

    fn out_of_bounds(&self, start: usize, end: usize) -> BufferError {
        BufferError::IndexOutOfBounds {
            start,
            end,
            len: self.content.len(),
        }
    }
}

fn build_lines(content: &[u8], newline: LineEnding) -> Vec<Line> {
    let marker = newline.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + marker.len() <= content.len() {
        if content[i..].starts_with(marker) {
            lines.push(Line { start, end: i });
            i += marker.len();
            start = i;
        } else {
            i += 1;
        }
    }
    lines.push(Line {
        start,
        end: content.len(),
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(buffer: &TextBuffer) -> Vec<(usize, usize)> {
        buffer.lines().iter().map(|l| (l.start, l.end)).collect()
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::empty(LineEnding::Lf);
        assert_eq!(spans(&buffer), vec![(0, 0)]);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let buffer = TextBuffer::new("ab\ncd\n", LineEnding::Lf);
        assert_eq!(spans(&buffer), vec![(0, 2), (3, 5), (6, 6)]);
    }

    #[test]
    fn test_crlf_lines() {
        let buffer = TextBuffer::new("abc\r\nedf", LineEnding::Crlf);
        assert_eq!(spans(&buffer), vec![(0, 3), (5, 8)]);
        assert_eq!(buffer.row(4), 0);
        assert_eq!(buffer.row(5), 1);
    }

    #[test]
    fn test_bare_lf_is_not_a_break_in_crlf_buffer() {
        let buffer = TextBuffer::new("a\nb\r\nc", LineEnding::Crlf);
        assert_eq!(spans(&buffer), vec![(0, 3), (5, 6)]);
    }

    #[test]
    fn test_edit_rejects_out_of_bounds() {
        let mut buffer = TextBuffer::new("hello", LineEnding::Lf);
        assert_eq!(
            buffer.edit(3, 9, b"x"),
            Err(BufferError::IndexOutOfBounds {
                start: 3,
                end: 9,
                len: 5
            })
        );
        assert!(buffer.edit(4, 2, b"").is_err());
        assert_eq!(buffer.content(), b"hello");
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_edit_reports_points() {
        let mut buffer = TextBuffer::new("ab\ncd", LineEnding::Lf);
        let edit = buffer.edit(1, 4, b"XY\nZ").unwrap();
        assert_eq!(buffer.content(), b"aXY\nZd");
        assert_eq!(edit.start_point, Position::new(0, 1));
        assert_eq!(edit.old_end_point, Position::new(1, 1));
        assert_eq!(edit.new_end_point, Position::new(1, 1));
        assert_eq!(edit.removed_len(), 3);
        assert_eq!(edit.replacement_len(), 4);
        assert_eq!(buffer.version(), 1);
    }

    #[test]
    fn test_rune_coord_round_trip() {
        let buffer = TextBuffer::new("zażółć\ngęś", LineEnding::Lf);
        let index = buffer.index_from_rune_coord(Position::new(1, 2)).unwrap();
        assert_eq!(&buffer.content()[index..], "ś".as_bytes());
        assert_eq!(buffer.rune_coord(index).unwrap(), Position::new(1, 2));
        assert_eq!(buffer.coord(index).unwrap(), Position::new(1, 3));
    }

    #[test]
    fn test_column_past_width_resolves_to_next_line() {
        let buffer = TextBuffer::new("ab\ncd", LineEnding::Lf);
        assert_eq!(buffer.index_from_rune_coord(Position::new(0, 2)).unwrap(), 2);
        assert_eq!(buffer.index_from_rune_coord(Position::new(0, 7)).unwrap(), 3);
        assert_eq!(buffer.index_from_rune_coord(Position::new(1, 7)).unwrap(), 5);
        assert!(buffer.index_from_rune_coord(Position::new(2, 0)).is_err());
    }
}
