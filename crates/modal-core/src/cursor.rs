//! Value-type cursors over a [`TextBuffer`].
//!
//! A [`Cursor`] is a byte index into a buffer plus a positioning mode:
//!
//! - **edge** mode sits between characters and may rest on a line end (insert mode);
//! - **char** mode sits on a character and never rests on the end of a non-empty line
//!   (normal, visual and tree modes).
//!
//! Every navigation method returns a new cursor, so motions compose by chaining. Because a
//! cursor borrows its buffer, code that needs to keep a position across edits stores a detached
//! [`Caret`] and re-attaches it to the buffer when needed.
//!
//! # Example
//!
//! ```rust
//! use modal_core::{Cursor, LineEnding, TextBuffer};
//!
//! let buffer = TextBuffer::new("abc (123)", LineEnding::Lf);
//! let cursor = Cursor::new(&buffer, 0, false);
//!
//! assert_eq!(cursor.word_start_next().index(), 4);
//! assert_eq!(cursor.word_end_next().index(), 2);
//! assert_eq!(cursor.to_line_end().index(), 8);
//! assert_eq!(cursor.as_edge().to_line_end().index(), 9);
//! ```

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::buffer::{BufferEdit, Line, Position, TextBuffer};
use crate::text::{decode_last_rune, decode_rune, rune_count, rune_offset};

/// Errors raised by cursor searches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The searched byte sequence does not occur in the scanned direction.
    #[error("sequence not found: {0:?}")]
    SequenceNotFound(String),
}

/// Word classes used by word motions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Whitespace, line ends and the end of the buffer.
    Space,
    /// Letters, digits and underscore.
    Word,
    /// ASCII punctuation and symbols.
    Punctuation,
    /// Anything else.
    Other,
}

impl CharClass {
    /// Classify a character.
    pub fn of(ch: char) -> Self {
        if ch.is_whitespace() {
            Self::Space
        } else if ch.is_alphanumeric() || ch == '_' {
            Self::Word
        } else if ch.is_ascii_punctuation() {
            Self::Punctuation
        } else {
            Self::Other
        }
    }
}

/// A cursor detached from its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Caret {
    /// Byte index.
    pub index: usize,
    /// Whether the caret uses edge positioning.
    pub as_edge: bool,
}

impl Caret {
    /// Create a caret.
    pub const fn new(index: usize, as_edge: bool) -> Self {
        Self { index, as_edge }
    }

    /// Attach to `buffer`, clamping the index into a valid position.
    pub fn attach(self, buffer: &TextBuffer) -> Cursor<'_> {
        Cursor::new(buffer, self.index, self.as_edge)
    }

    /// Remap the caret through a buffer edit.
    ///
    /// Positions at or after the old end move by the length difference, positions strictly
    /// inside the replaced range collapse to at most the end of the replacement, and positions
    /// at or before the start stay put.
    pub fn update(self, edit: &BufferEdit) -> Self {
        let index = if self.index >= edit.old_end {
            self.index - edit.old_end + edit.new_end
        } else if self.index > edit.start {
            self.index.min(edit.new_end)
        } else {
            self.index
        };
        Self { index, ..self }
    }
}

/// A position in a buffer.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buffer: &'a TextBuffer,
    index: usize,
    as_edge: bool,
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.buffer, other.buffer)
            && self.index == other.index
            && self.as_edge == other.as_edge
    }
}

impl Eq for Cursor<'_> {}

impl<'a> Cursor<'a> {
    /// Create a cursor at `index`, clamped into a valid position for the mode.
    pub fn new(buffer: &'a TextBuffer, index: usize, as_edge: bool) -> Self {
        Self {
            buffer,
            index: 0,
            as_edge,
        }
        .to_index(index)
    }

    /// The buffer this cursor points into.
    pub fn buffer(&self) -> &'a TextBuffer {
        self.buffer
    }

    /// Byte index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the cursor uses edge positioning.
    pub fn is_edge(&self) -> bool {
        self.as_edge
    }

    /// Detach from the buffer.
    pub fn caret(&self) -> Caret {
        Caret::new(self.index, self.as_edge)
    }

    /// Row of the cursor.
    pub fn row(&self) -> usize {
        self.buffer.row(self.index)
    }

    /// Line of the cursor.
    pub fn line(&self) -> Line {
        self.buffer.lines()[self.row()]
    }

    /// Code-point-based coordinate.
    pub fn pos(&self) -> Position {
        let row = self.row();
        let line = self.buffer.lines()[row];
        let col = rune_count(&self.buffer.content()[line.start..self.index.min(line.end)]);
        Position::new(row, col)
    }

    /// Byte-based coordinate.
    pub fn byte_pos(&self) -> Position {
        let row = self.row();
        Position::new(row, self.index - self.buffer.lines()[row].start)
    }

    /// Terminal cell column of the cursor within its line.
    pub fn display_col(&self) -> usize {
        let line = self.line();
        let prefix = &self.buffer.content()[line.start..self.index.min(line.end)];
        String::from_utf8_lossy(prefix).width()
    }

    /// Character under the cursor, `None` at the end of the buffer.
    pub fn rune(&self) -> Option<char> {
        let rest = &self.buffer.content()[self.index..];
        (!rest.is_empty()).then(|| decode_rune(rest).0)
    }

    /// Word class under the cursor; line ends count as whitespace.
    pub fn class(&self) -> CharClass {
        if self.index >= self.line().end {
            return CharClass::Space;
        }
        self.rune().map_or(CharClass::Space, CharClass::of)
    }

    /// Whether the cursor rests on a newline sequence.
    pub fn is_line_break(&self) -> bool {
        !self.is_end() && self.index >= self.line().end
    }

    /// Whether the cursor is at the end of the buffer.
    pub fn is_end(&self) -> bool {
        self.index >= self.buffer.len()
    }

    /// Whether the cursor is at the start of the buffer.
    pub fn is_beginning(&self) -> bool {
        self.index == 0
    }

    /// Whether the content at the cursor starts with `seq`.
    pub fn matches(&self, seq: &[u8]) -> bool {
        self.buffer.content()[self.index..].starts_with(seq)
    }

    /// Move to `index`, clipped to the buffer.
    ///
    /// Indices inside a newline sequence snap to the end of their line. In char mode the end
    /// of a non-empty line clamps to the start of its last character.
    pub fn to_index(self, index: usize) -> Self {
        let mut index = index.min(self.buffer.len());
        let line = self.buffer.lines()[self.buffer.row(index)];
        if index > line.end {
            index = line.end;
        }
        if !self.as_edge && !line.is_empty() && index == line.end {
            let (_, width) = decode_last_rune(&self.buffer.content()[line.range()]);
            index = line.end - width;
        }
        Self { index, ..self }
    }

    /// Switch to edge positioning.
    pub fn as_edge(self) -> Self {
        Self {
            as_edge: true,
            ..self
        }
    }

    /// Switch to char positioning, reclamping the index.
    pub fn as_char(self) -> Self {
        Self {
            as_edge: false,
            ..self
        }
        .to_index(self.index)
    }

    /// Step forward `n` raw bytes.
    pub fn bytes_forward(self, n: usize) -> Self {
        self.to_index(self.index.saturating_add(n))
    }

    /// Step backward `n` raw bytes.
    pub fn bytes_backward(self, n: usize) -> Self {
        self.to_index(self.index.saturating_sub(n))
    }

    /// Step forward one code point.
    ///
    /// Leaving the end of a line lands on the start of the next one. At the end of the buffer
    /// the cursor does not move.
    pub fn rune_next(self) -> Self {
        let row = self.row();
        let line = self.buffer.lines()[row];
        if self.index < line.end {
            let (_, width) = decode_rune(&self.buffer.content()[self.index..line.end]);
            let next = self.index + width;
            if next < line.end || self.as_edge {
                return self.to_index(next);
            }
        }
        match self.buffer.line(row + 1) {
            Some(next) => self.to_index(next.start),
            None => self,
        }
    }

    /// Step backward one code point.
    ///
    /// Leaving the start of a line lands on the end of the previous one (its last character in
    /// char mode). At the start of the buffer the cursor does not move.
    pub fn rune_prev(self) -> Self {
        let row = self.row();
        let line = self.buffer.lines()[row];
        if self.index <= line.start {
            return match row.checked_sub(1) {
                Some(prev) => self.to_index(self.buffer.lines()[prev].end),
                None => self,
            };
        }
        let end = self.index.min(line.end);
        let (_, width) = decode_last_rune(&self.buffer.content()[line.start..end]);
        self.to_index(end - width)
    }

    /// Start of row `row`, clipped to the last line.
    pub fn move_to_row(self, row: usize) -> Self {
        let row = row.min(self.buffer.line_count() - 1);
        self.to_index(self.buffer.lines()[row].start)
    }

    /// Code point column `col` of the current line, clipped to the line.
    pub fn move_to_col(self, col: usize) -> Self {
        let line = self.line();
        let bytes = &self.buffer.content()[line.range()];
        let width = rune_count(bytes);
        let max = if self.as_edge {
            width
        } else {
            width.saturating_sub(1)
        };
        let offset = rune_offset(bytes, col.min(max)).unwrap_or(line.len());
        self.to_index(line.start + offset)
    }

    /// Move to a code-point-based coordinate, clipping both parts.
    pub fn move_to_pos(self, pos: Position) -> Self {
        self.move_to_row(pos.row).move_to_col(pos.col)
    }

    /// Move `delta` rows keeping column `col`; no-op if the target row does not exist.
    pub fn vertical_shift(self, delta: isize, col: usize) -> Self {
        match self.row().checked_add_signed(delta) {
            Some(row) if row < self.buffer.line_count() => self.move_to_row(row).move_to_col(col),
            _ => self,
        }
    }

    /// Start of the current line.
    pub fn to_line_start(self) -> Self {
        self.to_index(self.line().start)
    }

    /// End of the current line (its last character in char mode).
    pub fn to_line_end(self) -> Self {
        self.to_index(self.line().end)
    }

    /// First non-whitespace character of the current line, or its end.
    pub fn to_line_text_start(self) -> Self {
        let line = self.line();
        let bytes = &self.buffer.content()[line.range()];
        let mut offset = 0;
        while offset < bytes.len() {
            let (ch, width) = decode_rune(&bytes[offset..]);
            if !ch.is_whitespace() {
                break;
            }
            offset += width;
        }
        self.to_index(line.start + offset)
    }

    /// Start of the next word.
    ///
    /// Stops at the first position whose class is not whitespace and differs from the class of
    /// the position before it. A line boundary counts as whitespace.
    pub fn word_start_next(self) -> Self {
        let mut cur = self;
        loop {
            let next = cur.rune_next();
            if next.index == cur.index {
                return cur;
            }
            let before = if next.row() != cur.row() {
                CharClass::Space
            } else {
                cur.class()
            };
            let class = next.class();
            cur = next;
            if class != CharClass::Space && class != before {
                return cur;
            }
        }
    }

    /// End of the current or next word.
    ///
    /// Steps once, skips whitespace, then extends over the run of the same class on the line.
    pub fn word_end_next(self) -> Self {
        let Some(cur) = self.skip_space(self.rune_next(), Self::rune_next) else {
            return self;
        };
        cur.extend_run(Self::rune_next)
    }

    /// Start of the current or previous word.
    pub fn word_start_prev(self) -> Self {
        let Some(cur) = self.skip_space(self.rune_prev(), Self::rune_prev) else {
            return self;
        };
        cur.extend_run(Self::rune_prev)
    }

    /// End of the previous word.
    pub fn word_end_prev(self) -> Self {
        let mut cur = self;
        loop {
            let prev = cur.rune_prev();
            if prev.index == cur.index {
                return cur;
            }
            let after = if prev.row() != cur.row() {
                CharClass::Space
            } else {
                cur.class()
            };
            let class = prev.class();
            cur = prev;
            if class != CharClass::Space && class != after {
                return cur;
            }
        }
    }

    /// Next occurrence of `seq`, starting one byte after the cursor.
    pub fn search_forward(self, seq: &[u8]) -> Result<Self, CursorError> {
        let content = self.buffer.content();
        if !seq.is_empty() {
            let mut i = self.index + 1;
            while i + seq.len() <= content.len() {
                if content[i..].starts_with(seq) {
                    return Ok(self.to_index(i));
                }
                i += 1;
            }
        }
        Err(not_found(seq))
    }

    /// Previous occurrence of `seq`, starting one byte before the cursor.
    pub fn search_backward(self, seq: &[u8]) -> Result<Self, CursorError> {
        let content = self.buffer.content();
        if !seq.is_empty() {
            let mut i = self.index;
            while i > 0 {
                i -= 1;
                if content[i..].starts_with(seq) {
                    return Ok(self.to_index(i));
                }
            }
        }
        Err(not_found(seq))
    }

    /// Step from `first` while on whitespace. `None` if `first` did not move.
    fn skip_space(self, first: Self, step: fn(Self) -> Self) -> Option<Self> {
        if first.index == self.index {
            return None;
        }
        let mut cur = first;
        while cur.class() == CharClass::Space {
            let next = step(cur);
            if next.index == cur.index {
                break;
            }
            cur = next;
        }
        Some(cur)
    }

    /// Step while the next position stays on the line with the same class.
    fn extend_run(self, step: fn(Self) -> Self) -> Self {
        let mut cur = self;
        loop {
            let next = step(cur);
            if next.index == cur.index || next.row() != cur.row() || next.class() != cur.class()
            {
                return cur;
            }
            cur = next;
        }
    }
}

fn not_found(seq: &[u8]) -> CursorError {
    CursorError::SequenceNotFound(String::from_utf8_lossy(seq).into_owned())
}
