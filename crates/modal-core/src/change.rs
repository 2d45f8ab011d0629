//! Reversible, composable buffer changes.
//!
//! # Overview
//!
//! A [`Change`] is a closed algebra of edits:
//!
//! - [`Change::Empty`] does nothing;
//! - [`Change::Replace`] replaces the bytes at one offset and records cursor and anchor
//!   positions before and after;
//! - [`Change::Composite`] applies an ordered list of changes.
//!
//! Swapping two disjoint regions is built by [`Change::swap`] as a composite of two replaces.
//! Every change can be reversed, so undo is simply applying [`Change::reverse`].
//!
//! Changes apply against a [`ChangeContext`], which owns the buffer and the primary cursor and
//! anchor.
//!
//! # Example
//!
//! ```rust
//! use modal_core::{Change, Replace};
//! # use modal_core::{BufferEdit, BufferError, ChangeContext, LineEnding, TextBuffer};
//! # struct Ctx(TextBuffer);
//! # impl ChangeContext for Ctx {
//! #     fn edit(&mut self, s: usize, e: usize, r: &[u8]) -> Result<BufferEdit, BufferError> {
//! #         self.0.edit(s, e, r)
//! #     }
//! #     fn set_cursor(&mut self, _: usize) {}
//! #     fn set_anchor(&mut self, _: usize) {}
//! # }
//! # let mut ctx = Ctx(TextBuffer::new("hello", LineEnding::Lf));
//!
//! let change = Change::Replace(Replace::new(5, "", " bye"));
//! change.apply(&mut ctx).unwrap();
//! assert_eq!(ctx.0.content(), b"hello bye");
//!
//! change.reverse().apply(&mut ctx).unwrap();
//! assert_eq!(ctx.0.content(), b"hello");
//! ```

use std::ops::Range;

use crate::buffer::{BufferEdit, BufferError, TextBuffer};
use crate::text::decode_rune;

/// The target a [`Change`] applies to.
pub trait ChangeContext {
    /// Replace `start..end` of the buffer with `replacement`.
    fn edit(
        &mut self,
        start: usize,
        end: usize,
        replacement: &[u8],
    ) -> Result<BufferEdit, BufferError>;

    /// Move the primary cursor to `index`.
    fn set_cursor(&mut self, index: usize);

    /// Move the anchor (the other end of the selection) to `index`.
    fn set_anchor(&mut self, index: usize);
}

/// Replacement of `before` with `after` at byte offset `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// Offset of the replaced bytes.
    pub at: usize,
    /// Bytes present before the change.
    pub before: Vec<u8>,
    /// Bytes present after the change.
    pub after: Vec<u8>,
    /// Cursor index before the change.
    pub cursor_before: usize,
    /// Cursor index after the change.
    pub cursor_after: usize,
    /// Anchor index before the change.
    pub anchor_before: usize,
    /// Anchor index after the change.
    pub anchor_after: usize,
}

impl Replace {
    /// Create a replacement; every cursor and anchor snapshot defaults to `at`.
    pub fn new(at: usize, before: impl Into<Vec<u8>>, after: impl Into<Vec<u8>>) -> Self {
        Self {
            at,
            before: before.into(),
            after: after.into(),
            cursor_before: at,
            cursor_after: at,
            anchor_before: at,
            anchor_after: at,
        }
    }

    /// Removal of `start..end` (bounds in any order).
    pub fn erase(buffer: &TextBuffer, start: usize, end: usize) -> Result<Self, BufferError> {
        let range = start.min(end)..start.max(end);
        let before = buffer.slice(range.clone())?;
        Ok(Self::new(range.start, before, Vec::new()))
    }

    /// Removal of line `row` together with one adjacent newline sequence.
    ///
    /// The newline after the line is removed; for the last line of a multi-line buffer the
    /// newline before it is removed instead.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not a line of `buffer`.
    pub fn erase_line(buffer: &TextBuffer, row: usize) -> Self {
        let count = buffer.line_count();
        assert!(row < count, "erase_line: row {row} outside 0..{count}");
        let lines = buffer.lines();
        let (start, end) = if row + 1 == count && row > 0 {
            (lines[row - 1].end, buffer.len())
        } else {
            (lines[row].start, buffer.next_line_start(row))
        };
        Self::new(start, &buffer.content()[start..end], Vec::new())
    }

    /// Set the cursor snapshots.
    pub fn with_cursor(mut self, before: usize, after: usize) -> Self {
        self.cursor_before = before;
        self.cursor_after = after;
        self
    }

    /// Set the anchor snapshots.
    pub fn with_anchor(mut self, before: usize, after: usize) -> Self {
        self.anchor_before = before;
        self.anchor_after = after;
        self
    }

    /// End of the replaced range before the change.
    pub fn old_end(&self) -> usize {
        self.at + self.before.len()
    }

    /// End of the replacement after the change.
    pub fn new_end(&self) -> usize {
        self.at + self.after.len()
    }

    /// Apply to `ctx` and move cursor and anchor to the "after" snapshots.
    pub fn apply<C: ChangeContext + ?Sized>(&self, ctx: &mut C) -> Result<BufferEdit, BufferError> {
        let edit = ctx.edit(self.at, self.old_end(), &self.after)?;
        ctx.set_cursor(self.cursor_after);
        ctx.set_anchor(self.anchor_after);
        Ok(edit)
    }

    /// The inverse replacement.
    pub fn reverse(&self) -> Self {
        Self {
            at: self.at,
            before: self.after.clone(),
            after: self.before.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
            anchor_before: self.anchor_after,
            anchor_after: self.anchor_before,
        }
    }

    /// Map an index from before the change to after it.
    pub fn shift(&self, index: usize) -> usize {
        if index < self.at {
            index
        } else if index > self.old_end() {
            index - self.before.len() + self.after.len()
        } else {
            index.min(self.new_end())
        }
    }

    /// Whether the change leaves the content untouched.
    pub fn is_empty(&self) -> bool {
        self.before == self.after
    }

    /// Fold `next` into `self` when both belong to one typing run.
    ///
    /// Joins an insert directly after this one's inserted bytes, a backspace directly before
    /// this one's start, a forward delete at the same offset, and a backspace that eats back
    /// into this one's inserted bytes. Returns `false` and leaves `self` untouched otherwise.
    pub fn try_merge(&mut self, next: &Replace) -> bool {
        let merged = if next.before.is_empty() && next.at == self.new_end() {
            let mut after = self.after.clone();
            after.extend_from_slice(&next.after);
            Some((self.at, self.before.clone(), after))
        } else if !next.after.is_empty() {
            None
        } else if self.after.is_empty() && next.old_end() == self.at {
            let mut before = next.before.clone();
            before.extend_from_slice(&self.before);
            Some((next.at, before, Vec::new()))
        } else if self.after.is_empty() && next.at == self.at {
            let mut before = self.before.clone();
            before.extend_from_slice(&next.before);
            Some((self.at, before, Vec::new()))
        } else if next.at >= self.at && next.old_end() == self.new_end() {
            let mut after = self.after.clone();
            after.truncate(next.at - self.at);
            Some((self.at, self.before.clone(), after))
        } else {
            None
        };

        let Some((at, before, after)) = merged else {
            return false;
        };
        self.at = at;
        self.before = before;
        self.after = after;
        self.cursor_after = next.cursor_after;
        self.anchor_after = next.anchor_after;
        true
    }
}

/// A reversible edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Change {
    /// No-op.
    #[default]
    Empty,
    /// Single replacement.
    Replace(Replace),
    /// Ordered sequence of changes.
    Composite(Vec<Change>),
}

impl From<Replace> for Change {
    fn from(replace: Replace) -> Self {
        Self::Replace(replace)
    }
}

impl Change {
    /// Insert `bytes` at `at`.
    pub fn insert(at: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Replace(Replace::new(at, Vec::new(), bytes))
    }

    /// Remove `start..end` (bounds in any order).
    pub fn erase(buffer: &TextBuffer, start: usize, end: usize) -> Result<Self, BufferError> {
        Replace::erase(buffer, start, end).map(Self::Replace)
    }

    /// Remove the code point at `index`; empty at the end of the buffer.
    pub fn erase_rune(buffer: &TextBuffer, index: usize) -> Result<Self, BufferError> {
        buffer.check_index(index)?;
        let (_, width) = decode_rune(&buffer.content()[index..]);
        if width == 0 {
            return Ok(Self::Empty);
        }
        Self::erase(buffer, index, index + width)
    }

    /// Remove line `row` together with one adjacent newline sequence.
    ///
    /// See [`Replace::erase_line`].
    ///
    /// # Panics
    ///
    /// Panics if `row` is not a line of `buffer`.
    pub fn erase_line(buffer: &TextBuffer, row: usize) -> Self {
        Self::Replace(Replace::erase_line(buffer, row))
    }

    /// Swap two disjoint regions `a` and `b`, `a` before `b`.
    ///
    /// The later region is replaced first so the earlier offsets stay valid. Cursor and anchor
    /// snapshots of each step are `cursor`/`anchor` shifted through the steps before it.
    ///
    /// # Panics
    ///
    /// Panics unless `a.start <= a.end <= b.start <= b.end <= buffer.len()`.
    pub fn swap(
        buffer: &TextBuffer,
        cursor: usize,
        anchor: usize,
        a: Range<usize>,
        b: Range<usize>,
    ) -> Self {
        assert!(
            a.start <= a.end && a.end <= b.start && b.start <= b.end && b.end <= buffer.len(),
            "swap: disordered regions {a:?} and {b:?} (len {})",
            buffer.len()
        );
        let content = buffer.content();
        let first = Replace::new(b.start, &content[b.clone()], &content[a.clone()]);
        let first = first
            .clone()
            .with_cursor(cursor, first.shift(cursor))
            .with_anchor(anchor, first.shift(anchor));

        let second = Replace::new(a.start, &content[a], &content[b]);
        let second = second
            .clone()
            .with_cursor(first.cursor_after, second.shift(first.cursor_after))
            .with_anchor(first.anchor_after, second.shift(first.anchor_after));

        Self::Composite(vec![Self::Replace(first), Self::Replace(second)])
    }

    /// Apply to `ctx`.
    ///
    /// A composite stops at the first failing step, leaving earlier steps applied.
    pub fn apply<C: ChangeContext + ?Sized>(&self, ctx: &mut C) -> Result<(), BufferError> {
        match self {
            Self::Empty => Ok(()),
            Self::Replace(replace) => replace.apply(ctx).map(|_| ()),
            Self::Composite(changes) => changes.iter().try_for_each(|change| change.apply(ctx)),
        }
    }

    /// The inverse change.
    pub fn reverse(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Replace(replace) => Self::Replace(replace.reverse()),
            Self::Composite(changes) => {
                Self::Composite(changes.iter().rev().map(Change::reverse).collect())
            }
        }
    }

    /// Map an index from before the change to after it.
    pub fn shift(&self, index: usize) -> usize {
        match self {
            Self::Empty => index,
            Self::Replace(replace) => replace.shift(index),
            Self::Composite(changes) => changes.iter().fold(index, |i, change| change.shift(i)),
        }
    }

    /// Whether the change counts as empty.
    ///
    /// A composite is empty when it has no steps or when any of its steps is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Replace(replace) => replace.is_empty(),
            Self::Composite(changes) => changes.is_empty() || changes.iter().any(Change::is_empty),
        }
    }

    /// Whether the change leaves the content untouched: every step is a no-op.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Replace(replace) => replace.is_empty(),
            Self::Composite(changes) => changes.iter().all(Change::is_noop),
        }
    }
}
