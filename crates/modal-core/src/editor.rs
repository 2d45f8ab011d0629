//! The operation executor.
//!
//! # Overview
//!
//! [`Editor`] owns a [`TextBuffer`], the primary cursor and the anchor (the other end of the
//! selection), the current [`Mode`] and a [`History`]. It runs [`Operation`]s produced by the
//! [`Scanner`]:
//!
//! - every buffer modification is built as a [`Change`], applied through [`ChangeContext`] and
//!   recorded in the history;
//! - edits under a repeat count are recorded as one composite, so `3x` undoes in one step;
//! - consecutive typing and erasing in insert mode is coalesced into one change, recorded when
//!   the run ends.
//!
//! Hosts plug in a [`SyntaxTree`] for tree mode and may [`subscribe`](Editor::subscribe) to
//! buffer edits, for example to feed an incremental parser or invalidate render caches.
//!
//! # Example
//!
//! ```rust
//! use modal_core::{Editor, Mode, Scanner};
//!
//! let mut editor = Editor::new("hello");
//! let mut scanner = Scanner::new();
//!
//! editor.feed(&mut scanner, "A bye<Esc>").unwrap();
//! assert_eq!(editor.text(), "hello bye");
//! assert_eq!(editor.mode(), Mode::Normal);
//!
//! editor.feed(&mut scanner, "u").unwrap();
//! assert_eq!(editor.text(), "hello");
//! ```

use std::borrow::Cow;
use std::ops::Range;

use tracing::{debug, warn};

use crate::buffer::{BufferEdit, BufferError, TextBuffer};
use crate::change::{Change, ChangeContext, Replace};
use crate::config::CoreConfig;
use crate::cursor::{Caret, Cursor};
use crate::history::History;
use crate::key::{KeyEvent, parse_keys};
use crate::operation::{Mode, Operation};
use crate::scanner::{ScanOutcome, Scanner};
use crate::syntax::{SyntaxNode, SyntaxTree};
use crate::text::{decode_last_rune, decode_rune};

/// Callback invoked after every buffer edit.
pub type EditCallback = Box<dyn FnMut(&BufferEdit) + Send>;

/// Copied or erased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    /// Raw bytes.
    pub bytes: Vec<u8>,
    /// Whether the bytes are whole lines, pasted below the cursor line.
    pub linewise: bool,
}

/// Editing state and operation executor.
pub struct Editor {
    buffer: TextBuffer,
    cursor: Caret,
    anchor: Caret,
    mode: Mode,
    history: History,
    register: Option<Register>,
    column: Option<usize>,
    quitting: bool,
    config: CoreConfig,
    syntax: Option<Box<dyn SyntaxTree + Send>>,
    node: Option<SyntaxNode>,
    typing: Option<Replace>,
    batch: Option<Vec<Change>>,
    subscribers: Vec<EditCallback>,
}

impl Editor {
    /// Create an editor over `content` with the default configuration.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self::with_config(content, CoreConfig::default())
    }

    /// Create an editor over `content`, detecting its newline sequence.
    pub fn with_config(content: impl Into<Vec<u8>>, config: CoreConfig) -> Self {
        let buffer = TextBuffer::from_bytes(content, config.default_line_ending);
        Self::from_buffer(buffer, config)
    }

    /// Create an editor over an existing buffer.
    pub fn from_buffer(buffer: TextBuffer, config: CoreConfig) -> Self {
        Self {
            buffer,
            cursor: Caret::default(),
            anchor: Caret::default(),
            mode: Mode::Normal,
            history: History::with_policy(config.empty_policy),
            register: None,
            column: None,
            quitting: false,
            config,
            syntax: None,
            node: None,
            typing: None,
            batch: None,
            subscribers: Vec::new(),
        }
    }

    /// The buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Buffer content decoded for display.
    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text_lossy()
    }

    /// The primary cursor.
    pub fn cursor(&self) -> Cursor<'_> {
        self.cursor.attach(&self.buffer)
    }

    /// The anchor.
    pub fn anchor(&self) -> Cursor<'_> {
        self.anchor.attach(&self.buffer)
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The change history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The register.
    pub fn register(&self) -> Option<&Register> {
        self.register.as_ref()
    }

    /// The configuration.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Whether a quit was requested.
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// The selected syntax node in tree mode.
    pub fn node(&self) -> Option<SyntaxNode> {
        self.node
    }

    /// Install the syntax tree used by tree mode.
    pub fn set_syntax_tree(&mut self, tree: Box<dyn SyntaxTree + Send>) {
        self.syntax = Some(tree);
    }

    /// Register a callback invoked after every buffer edit.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&BufferEdit) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Move the cursor to `index`, collapsing the selection.
    pub fn move_cursor_to(&mut self, index: usize) {
        self.collapse_to(index);
    }

    /// The selected byte range.
    ///
    /// Cursor and anchor are inclusive; a selection ending on a line end includes the newline
    /// sequence. In tree mode this is the selected node.
    pub fn selection(&self) -> Range<usize> {
        if self.mode == Mode::Tree
            && let Some(node) = self.node
        {
            return node.range();
        }
        let lo = self.cursor.index.min(self.anchor.index);
        let hi = self.cursor.index.max(self.anchor.index);
        if hi >= self.buffer.len() {
            return lo..hi;
        }
        let row = self.buffer.row(hi);
        let end = if hi >= self.buffer.lines()[row].end {
            self.buffer.next_line_start(row)
        } else {
            hi + decode_rune(&self.buffer.content()[hi..]).1
        };
        lo..end
    }

    /// Record the pending typing run in the history.
    pub fn finish_typing_run(&mut self) {
        if let Some(run) = self.typing.take() {
            self.record(Change::Replace(run));
        }
    }

    /// Push `key` into `scanner` and run every operation it completes.
    pub fn handle_key(&mut self, scanner: &mut Scanner, key: KeyEvent) -> Result<(), BufferError> {
        scanner.push(key);
        self.drain(scanner)
    }

    /// Feed keys in vim notation one by one, see [`parse_keys`].
    pub fn feed(&mut self, scanner: &mut Scanner, keys: &str) -> Result<(), BufferError> {
        for key in parse_keys(keys) {
            self.handle_key(scanner, key)?;
        }
        Ok(())
    }

    /// Scan and execute until the scanner needs more input or a quit is requested.
    pub fn drain(&mut self, scanner: &mut Scanner) -> Result<(), BufferError> {
        while !scanner.is_drained() && !self.quitting {
            match scanner.scan(self.mode) {
                ScanOutcome::Full(op) => self.execute(&op)?,
                ScanOutcome::None => {}
                ScanOutcome::Stop => break,
            }
        }
        Ok(())
    }

    /// Run one operation.
    pub fn execute(&mut self, op: &Operation) -> Result<(), BufferError> {
        debug!(?op, mode = %self.mode, "execute");
        if self.mode != Mode::Insert || !op.extends_typing_run() {
            self.finish_typing_run();
        }
        self.run(op, None)
    }

    fn run(&mut self, op: &Operation, count: Option<usize>) -> Result<(), BufferError> {
        if !matches!(op, Operation::CursorUp | Operation::CursorDown) {
            self.column = None;
        }
        match op {
            Operation::None => {}
            Operation::Quit => self.quitting = true,
            Operation::Count { count, op } => return self.run_counted(*count, op),

            Operation::NormalMode => self.set_mode(Mode::Normal),
            Operation::InsertBeforeCursor => self.set_mode(Mode::Insert),
            Operation::InsertAfterCursor => {
                self.set_mode(Mode::Insert);
                self.motion(|c| if c.index() < c.line().end { c.rune_next() } else { c });
            }
            Operation::InsertAtLineStart => {
                self.set_mode(Mode::Insert);
                self.motion(|c| c.to_line_text_start());
            }
            Operation::InsertAtLineEnd => {
                self.set_mode(Mode::Insert);
                self.motion(|c| c.to_line_end());
            }
            Operation::InsertLineBelow => {
                let at = self.cursor().line().end;
                let newline = self.buffer.newline().as_bytes();
                self.set_mode(Mode::Insert);
                let replace = self.replace(at..at, newline, at + newline.len())?;
                self.extend_typing(replace)?;
            }
            Operation::InsertLineAbove => {
                let at = self.cursor().line().start;
                let newline = self.buffer.newline().as_bytes();
                self.set_mode(Mode::Insert);
                let replace = self.replace(at..at, newline, at)?;
                self.extend_typing(replace)?;
            }
            Operation::InsertSelectionStart => {
                let selection = self.selection();
                self.set_mode(Mode::Insert);
                self.collapse_to(selection.start);
            }
            Operation::InsertSelectionEnd => {
                let selection = self.selection();
                self.set_mode(Mode::Insert);
                self.collapse_to(selection.end);
            }
            Operation::VisualMode => {
                if self.mode != Mode::Tree {
                    self.anchor = self.cursor;
                }
                self.set_mode(Mode::Visual);
            }
            Operation::TreeMode => self.enter_tree_mode(),

            Operation::CursorLeft => {
                self.motion(|c| if c.index() > c.line().start { c.rune_prev() } else { c });
            }
            Operation::CursorRight => self.motion(|c| {
                let next = c.rune_next();
                if next.row() == c.row() { next } else { c }
            }),
            Operation::CursorUp => self.vertical(-1),
            Operation::CursorDown => self.vertical(1),
            Operation::WordStartNext => self.motion(|c| c.word_start_next()),
            Operation::WordStartPrev => self.motion(|c| c.word_start_prev()),
            Operation::WordEndNext => self.motion(|c| c.word_end_next()),
            Operation::WordEndPrev => self.motion(|c| c.word_end_prev()),
            Operation::LineStart => self.motion(|c| c.to_line_start()),
            Operation::LineTextStart => self.motion(|c| c.to_line_text_start()),
            Operation::LineEnd => self.motion(|c| c.to_line_end()),
            Operation::GoToLine => {
                let row = count.map_or(0, |n| n.saturating_sub(1));
                self.motion(|c| c.move_to_row(row).to_line_text_start());
            }
            Operation::GoToLastLine => {
                let last = self.buffer.line_count() - 1;
                let row = count.map_or(last, |n| n.saturating_sub(1));
                self.motion(|c| c.move_to_row(row).to_line_text_start());
            }
            Operation::FindForward(ch) => self.find(*ch, true),
            Operation::FindBackward(ch) => self.find(*ch, false),
            Operation::SwapCursorAnchor => std::mem::swap(&mut self.cursor, &mut self.anchor),

            Operation::InsertText(text) => self.insert_text(text.as_bytes())?,
            Operation::InsertTab => {
                let tab = self.config.tab_text.clone();
                self.insert_text(tab.as_bytes())?;
            }
            Operation::InsertNewLine => {
                let newline = self.buffer.newline();
                self.insert_text(newline.as_bytes())?;
            }
            Operation::EraseRune => self.erase_rune()?,
            Operation::EraseRunePrev => self.erase_rune_prev()?,
            Operation::EraseWordPrev => {
                let cursor = self.cursor().as_edge();
                let (start, end) = (cursor.word_start_prev().index(), cursor.index());
                if start < end {
                    let replace = self.replace(start..end, Vec::new(), start)?;
                    self.edit_at(replace)?;
                }
            }
            Operation::EraseLine => self.erase_line()?,
            Operation::ReplaceRune(ch) => {
                let cursor = self.cursor();
                let at = cursor.index();
                if at < cursor.line().end {
                    let width = decode_rune(&self.buffer.content()[at..]).1;
                    let mut utf8 = [0; 4];
                    let replacement = ch.encode_utf8(&mut utf8).as_bytes();
                    let replace = self.replace(at..at + width, replacement, at)?;
                    self.commit(replace.into())?;
                }
            }
            Operation::EraseSelection => {
                self.erase_selection()?;
                self.set_mode(Mode::Normal);
            }
            Operation::ReplaceSelection => {
                self.erase_selection()?;
                self.set_mode(Mode::Insert);
            }
            Operation::CopyLine => {
                let row = self.cursor().row();
                let mut bytes = self.buffer.line_bytes(row)?.to_vec();
                bytes.extend_from_slice(self.buffer.newline().as_bytes());
                self.register = Some(Register {
                    bytes,
                    linewise: true,
                });
            }
            Operation::CopySelection => {
                let selection = self.selection();
                self.yank(selection.clone())?;
                self.collapse_to(selection.start);
                self.set_mode(Mode::Normal);
            }
            Operation::Paste => self.paste()?,
            Operation::Undo => self.undo()?,
            Operation::Redo => self.redo()?,

            Operation::NodeParent => self.navigate(|tree, node| tree.parent(node)),
            Operation::NodeFirstChild => self.navigate(|tree, node| tree.first_child(node)),
            Operation::NodePrevSibling => self.navigate(|tree, node| tree.prev_sibling(node)),
            Operation::NodeNextSibling => self.navigate(|tree, node| tree.next_sibling(node)),
            Operation::NodeFirstSibling => self.navigate(|tree, node| Some(tree.first_sibling(node))),
            Operation::NodeLastSibling => self.navigate(|tree, node| Some(tree.last_sibling(node))),
            Operation::SwapNodePrev => self.swap_node(false)?,
            Operation::SwapNodeNext => self.swap_node(true)?,
        }
        Ok(())
    }

    /// Run `op` under a repeat count.
    ///
    /// Line jumps take the count as their argument and selection commands run once, since
    /// the selection is gone after the first run. Everything else repeats, with edits
    /// gathered into one history entry.
    fn run_counted(&mut self, count: usize, op: &Operation) -> Result<(), BufferError> {
        let max = self.config.max_repeat_count;
        let count = if count > max {
            warn!(count, max, "repeat count clamped");
            max
        } else {
            count
        };
        if matches!(op, Operation::GoToLine | Operation::GoToLastLine) {
            return self.run(op, Some(count));
        }
        if matches!(
            op,
            Operation::EraseSelection | Operation::ReplaceSelection | Operation::CopySelection
        ) {
            return self.run(op, None);
        }

        let batching = op.is_edit() && self.batch.is_none();
        if batching {
            self.batch = Some(Vec::new());
        }
        let result = (0..count.max(1)).try_for_each(|_| self.run(op, None));
        if batching {
            self.finish_typing_run();
            let mut changes = self.batch.take().unwrap_or_default();
            match changes.len() {
                0 => {}
                1 => self.record(changes.remove(0)),
                _ => self.record(Change::Composite(changes)),
            }
        }
        result
    }

    fn set_mode(&mut self, mode: Mode) {
        self.finish_typing_run();
        let as_edge = mode == Mode::Insert;
        self.cursor = self.clamp(Caret::new(self.cursor.index, as_edge));
        self.anchor = if matches!(mode, Mode::Normal | Mode::Insert) {
            self.cursor
        } else {
            self.clamp(Caret::new(self.anchor.index, as_edge))
        };
        if mode != Mode::Tree {
            self.node = None;
        }
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "mode change");
        }
        self.mode = mode;
    }

    fn clamp(&self, caret: Caret) -> Caret {
        caret.attach(&self.buffer).caret()
    }

    fn collapse_to(&mut self, index: usize) {
        self.cursor = self.clamp(Caret::new(index, self.cursor.as_edge));
        self.anchor = self.cursor;
    }

    fn motion<F>(&mut self, f: F)
    where
        F: for<'b> FnOnce(Cursor<'b>) -> Cursor<'b>,
    {
        let caret = f(self.cursor()).caret();
        self.cursor = caret;
    }

    fn vertical(&mut self, delta: isize) {
        let col = self.column.unwrap_or_else(|| self.cursor().pos().col);
        let caret = self.cursor().vertical_shift(delta, col).caret();
        self.cursor = caret;
        self.column = Some(col);
    }

    fn find(&mut self, ch: char, forward: bool) {
        let mut utf8 = [0; 4];
        let seq = ch.encode_utf8(&mut utf8).as_bytes();
        let cursor = self.cursor();
        let found = if forward {
            cursor.search_forward(seq)
        } else {
            cursor.search_backward(seq)
        };
        let target = match found {
            Ok(target) if target.row() == cursor.row() => Some(target.caret()),
            _ => None,
        };
        match target {
            Some(caret) => self.cursor = caret,
            None => debug!(%ch, "character not found on line"),
        }
    }

    /// A replace of `range` by `after` with snapshots taken from the current carets.
    fn replace(
        &self,
        range: Range<usize>,
        after: impl Into<Vec<u8>>,
        cursor_after: usize,
    ) -> Result<Replace, BufferError> {
        let before = self.buffer.slice(range.clone())?;
        Ok(self.snapshot(Replace::new(range.start, before, after), cursor_after))
    }

    fn snapshot(&self, replace: Replace, cursor_after: usize) -> Replace {
        let anchor_after = if self.anchor.index == self.cursor.index {
            cursor_after
        } else {
            replace.shift(self.anchor.index)
        };
        replace
            .with_cursor(self.cursor.index, cursor_after)
            .with_anchor(self.anchor.index, anchor_after)
    }

    fn commit(&mut self, change: Change) -> Result<(), BufferError> {
        change.apply(self)?;
        self.record(change);
        Ok(())
    }

    fn record(&mut self, change: Change) {
        if let Some(batch) = self.batch.as_mut() {
            if !change.is_noop() {
                batch.push(change);
            }
            return;
        }
        self.history.push(change, self.config.skip_empty_changes);
    }

    /// Apply as part of the typing run in insert mode, as a change of its own elsewhere.
    fn edit_at(&mut self, replace: Replace) -> Result<(), BufferError> {
        if self.mode == Mode::Insert {
            self.extend_typing(replace)
        } else {
            self.commit(replace.into())
        }
    }

    fn extend_typing(&mut self, replace: Replace) -> Result<(), BufferError> {
        replace.apply(self)?;
        let merged = self
            .typing
            .as_mut()
            .is_some_and(|run| run.try_merge(&replace));
        if !merged {
            self.finish_typing_run();
            self.typing = Some(replace);
        }
        Ok(())
    }

    fn insert_text(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let at = self.cursor.index;
        let replace = self.replace(at..at, bytes, at + bytes.len())?;
        self.edit_at(replace)
    }

    /// Erase the character at the cursor; in insert mode a line end joins the next line.
    fn erase_rune(&mut self) -> Result<(), BufferError> {
        let cursor = self.cursor();
        let at = cursor.index();
        let end = if at < cursor.line().end {
            at + decode_rune(&self.buffer.content()[at..]).1
        } else if self.mode == Mode::Insert {
            self.buffer.next_line_start(cursor.row())
        } else {
            at
        };
        if end == at {
            return Ok(());
        }
        let replace = self.replace(at..end, Vec::new(), at)?;
        self.edit_at(replace)
    }

    /// Erase the character before the cursor; only insert mode crosses line starts.
    fn erase_rune_prev(&mut self) -> Result<(), BufferError> {
        let cursor = self.cursor().as_edge();
        let at = cursor.index();
        if self.mode != Mode::Insert && at == cursor.line().start {
            return Ok(());
        }
        let start = cursor.rune_prev().index();
        if start == at {
            return Ok(());
        }
        let replace = self.replace(start..at, Vec::new(), start)?;
        self.edit_at(replace)
    }

    fn erase_line(&mut self) -> Result<(), BufferError> {
        let row = self.cursor().row();
        let lines = self.buffer.lines();
        let target = if row + 1 == lines.len() && row > 0 {
            lines[row - 1].start
        } else {
            lines[row].start
        };
        let mut bytes = self.buffer.line_bytes(row)?.to_vec();
        bytes.extend_from_slice(self.buffer.newline().as_bytes());
        self.register = Some(Register {
            bytes,
            linewise: true,
        });
        let replace = self.snapshot(Replace::erase_line(&self.buffer, row), target);
        self.commit(replace.into())
    }

    fn erase_selection(&mut self) -> Result<(), BufferError> {
        let selection = self.selection();
        self.yank(selection.clone())?;
        let replace = self.replace(selection.clone(), Vec::new(), selection.start)?;
        self.commit(replace.into())
    }

    fn yank(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        let bytes = self.buffer.slice(range)?.to_vec();
        self.register = Some(Register {
            bytes,
            linewise: false,
        });
        Ok(())
    }

    fn paste(&mut self) -> Result<(), BufferError> {
        let Some(register) = self.register.clone() else {
            debug!("paste with an empty register");
            return Ok(());
        };
        if register.bytes.is_empty() {
            return Ok(());
        }
        let cursor = self.cursor();
        let replace = if register.linewise {
            let newline = self.buffer.newline().as_bytes();
            match self.buffer.line(cursor.row() + 1) {
                Some(next) => self.replace(next.start..next.start, register.bytes, next.start)?,
                None => {
                    let at = self.buffer.len();
                    let mut bytes = newline.to_vec();
                    bytes.extend_from_slice(
                        register
                            .bytes
                            .strip_suffix(newline)
                            .unwrap_or(&register.bytes),
                    );
                    self.replace(at..at, bytes, at + newline.len())?
                }
            }
        } else {
            let at = if !cursor.is_edge() && cursor.index() < cursor.line().end {
                cursor.index() + decode_rune(&self.buffer.content()[cursor.index()..]).1
            } else {
                cursor.index()
            };
            let last = at + register.bytes.len() - decode_last_rune(&register.bytes).1;
            self.replace(at..at, register.bytes, last)?
        };
        self.commit(replace.into())
    }

    fn undo(&mut self) -> Result<(), BufferError> {
        let Some(change) = self.history.back().cloned() else {
            debug!("nothing to undo");
            return Ok(());
        };
        change.reverse().apply(self)?;
        self.reselect_node();
        Ok(())
    }

    fn redo(&mut self) -> Result<(), BufferError> {
        let Some(change) = self.history.forward().cloned() else {
            debug!("nothing to redo");
            return Ok(());
        };
        change.apply(self)?;
        self.reselect_node();
        Ok(())
    }

    fn enter_tree_mode(&mut self) {
        let selection = self.selection();
        let Some(tree) = self.syntax.as_deref() else {
            debug!("tree mode needs a syntax tree");
            return;
        };
        let Some(node) = tree.node_at(selection) else {
            debug!("no syntax node at the selection");
            return;
        };
        self.set_mode(Mode::Tree);
        self.select_node(node);
    }

    fn select_node(&mut self, node: SyntaxNode) {
        let last = match self.buffer.slice(node.range()) {
            Ok(bytes) if !bytes.is_empty() => node.end - decode_last_rune(bytes).1,
            _ => node.start,
        };
        self.cursor = self.clamp(Caret::new(node.start, false));
        self.anchor = self.clamp(Caret::new(last, false));
        self.node = Some(node);
    }

    /// After undo or redo in tree mode, select the node now around the carets.
    fn reselect_node(&mut self) {
        if self.mode != Mode::Tree {
            return;
        }
        let lo = self.cursor.index.min(self.anchor.index);
        let hi = self.cursor.index.max(self.anchor.index);
        let node = self
            .syntax
            .as_deref()
            .and_then(|tree| tree.node_at(lo..hi + 1));
        match node {
            Some(node) => self.select_node(node),
            None => self.set_mode(Mode::Normal),
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&dyn SyntaxTree, &SyntaxNode) -> Option<SyntaxNode>) {
        let (Some(tree), Some(node)) = (self.syntax.as_deref(), self.node) else {
            debug!("tree navigation without a selected node");
            return;
        };
        if let Some(target) = step(tree, &node) {
            self.select_node(target);
        }
    }

    fn swap_node(&mut self, forward: bool) -> Result<(), BufferError> {
        let (Some(tree), Some(node)) = (self.syntax.as_deref(), self.node) else {
            debug!("node swap without a selected node");
            return Ok(());
        };
        let sibling = if forward {
            tree.next_sibling(&node)
        } else {
            tree.prev_sibling(&node)
        };
        let Some(sibling) = sibling else {
            return Ok(());
        };
        let (first, second) = if forward {
            (node, sibling)
        } else {
            (sibling, node)
        };
        if first.start > first.end
            || second.start > second.end
            || first.end > second.start
            || second.end > self.buffer.len()
        {
            warn!(?first, ?second, "syntax tree returned disordered siblings");
            return Ok(());
        }

        let change = Change::swap(
            &self.buffer,
            self.cursor.index,
            self.anchor.index,
            first.range(),
            second.range(),
        );
        self.commit(change)?;

        let moved = if forward {
            second.end - node.len()..second.end
        } else {
            first.start..first.start + node.len()
        };
        let target = self
            .syntax
            .as_deref()
            .and_then(|tree| tree.node_at(moved.clone()))
            .unwrap_or(SyntaxNode {
                id: node.id,
                start: moved.start,
                end: moved.end,
            });
        self.select_node(target);
        Ok(())
    }
}

impl ChangeContext for Editor {
    fn edit(
        &mut self,
        start: usize,
        end: usize,
        replacement: &[u8],
    ) -> Result<BufferEdit, BufferError> {
        let edit = self.buffer.edit(start, end, replacement)?;
        self.cursor = self.cursor.update(&edit);
        self.anchor = self.anchor.update(&edit);
        if let Some(tree) = self.syntax.as_mut() {
            tree.edit(&edit, self.buffer.content());
        }
        for callback in &mut self.subscribers {
            callback(&edit);
        }
        Ok(edit)
    }

    fn set_cursor(&mut self, index: usize) {
        self.cursor = self.clamp(Caret::new(index, self.cursor.as_edge));
    }

    fn set_anchor(&mut self, index: usize) {
        self.anchor = self.clamp(Caret::new(index, self.anchor.as_edge));
    }
}
