//! Key-sequence scanner.
//!
//! # Overview
//!
//! The [`Scanner`] buffers raw [`KeyEvent`]s and turns them into [`Operation`]s one scan cycle
//! at a time. It keeps two cursors into its key list:
//!
//! - `start`: first event not yet consumed by a completed match;
//! - `curr`: read position of the scan in progress.
//!
//! A cycle tries the global bindings first, then the bindings of the current [`Mode`] in
//! priority order. Each attempt reports one of three [`ScanResult`]s: `Full` (matched),
//! `None` (cannot match) or `Stop` (the input ended while a match was still possible).
//!
//! At the top level:
//!
//! - a full match consumes its events and yields the operation;
//! - no match discards exactly one event;
//! - a stop keeps every event and waits for more input.
//!
//! A leading run of digits outside insert mode is a repeat count wrapped around the operation
//! that follows it (`3dd`, `000123j`).
//!
//! # Example
//!
//! ```rust
//! use modal_core::{parse_keys, Mode, Operation, ScanOutcome, Scanner};
//!
//! let mut scanner = Scanner::new();
//! for key in parse_keys("2d") {
//!     scanner.push(key);
//! }
//! assert_eq!(scanner.scan(Mode::Normal), ScanOutcome::Stop);
//!
//! scanner.push(parse_keys("d")[0]);
//! assert_eq!(
//!     scanner.scan(Mode::Normal),
//!     ScanOutcome::Full(Operation::EraseLine.counted(2))
//! );
//! ```

mod bindings;

use tracing::{debug, trace};

use crate::key::{KeyCode, KeyEvent, Modifiers};
use crate::operation::{Mode, Operation};

pub(crate) use bindings::{Binding, Pat};

/// Result of one matching attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResult {
    /// The attempt matched and consumed its events.
    Full,
    /// The attempt cannot match the input.
    None,
    /// The input ended before the attempt could decide.
    Stop,
}

/// Result of a scan cycle or of a binding group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A complete operation.
    Full(Operation),
    /// Nothing matches.
    None,
    /// More input is needed.
    Stop,
}

/// A group of bindings tried as one unit.
pub(crate) type Group = fn(&mut Scanner) -> ScanOutcome;

/// Buffered key events and scan state.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    keys: Vec<KeyEvent>,
    start: usize,
    curr: usize,
}

impl Scanner {
    /// Create an empty scanner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, key: KeyEvent) {
        self.keys.push(key);
    }

    /// Event at the read position.
    pub fn peek(&self) -> Option<&KeyEvent> {
        self.keys.get(self.curr)
    }

    /// Move the read position forward by one event.
    pub fn advance(&mut self) {
        if self.curr < self.keys.len() {
            self.curr += 1;
        }
    }

    /// Whether the read position is past the last event.
    pub fn is_end(&self) -> bool {
        self.curr >= self.keys.len()
    }

    /// Whether every event has been consumed.
    pub fn is_drained(&self) -> bool {
        self.start >= self.keys.len()
    }

    /// Events not yet consumed.
    pub fn input(&self) -> &[KeyEvent] {
        &self.keys[self.start..]
    }

    /// Events read by the scan in progress.
    pub fn scanned(&self) -> &[KeyEvent] {
        &self.keys[self.start..self.curr]
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.start = 0;
        self.curr = 0;
    }

    /// Rewind the read position to the first unconsumed event.
    pub fn reset(&mut self) {
        self.curr = self.start;
    }

    /// Run one scan cycle in `mode`.
    pub fn scan(&mut self, mode: Mode) -> ScanOutcome {
        self.reset();
        if self.is_end() {
            return ScanOutcome::Stop;
        }
        let outcome = self.first_match(groups(mode));
        match &outcome {
            ScanOutcome::Full(op) => {
                trace!(%mode, ?op, keys = self.scanned().len(), "scan matched");
                self.commit(self.curr);
            }
            ScanOutcome::None => {
                debug!(%mode, key = %self.keys[self.start], "no binding, key discarded");
                self.commit(self.start + 1);
            }
            ScanOutcome::Stop => {
                trace!(%mode, pending = self.input().len(), "scan waiting for input");
                self.reset();
            }
        }
        outcome
    }

    /// Match `cond` against the next event.
    pub fn scan_with(&mut self, cond: impl FnOnce(&KeyEvent) -> bool) -> ScanResult {
        let Some(key) = self.peek() else {
            return ScanResult::Stop;
        };
        if !cond(key) {
            return ScanResult::None;
        }
        self.advance();
        ScanResult::Full
    }

    /// Match a key without Control or Alt.
    pub fn scan_key(&mut self, code: KeyCode) -> ScanResult {
        self.scan_with(|key| key.code == code && !key.has_command_modifier())
    }

    /// Match a typed character.
    pub fn scan_char(&mut self, ch: char) -> ScanResult {
        self.scan_with(|key| key.text_char() == Some(ch))
    }

    /// Match a character typed with Control held.
    pub fn scan_ctrl(&mut self, ch: char) -> ScanResult {
        self.scan_with(|key| {
            matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
                && key.modifiers.contains(Modifiers::CTRL)
        })
    }

    /// Match a digit key.
    pub fn scan_digit(&mut self) -> ScanResult {
        self.scan_with(|key| key.digit().is_some())
    }

    /// Match any text-producing key.
    pub fn scan_text_input(&mut self) -> ScanResult {
        self.scan_with(|key| key.text_char().is_some())
    }

    /// Apply `f` as often as it matches.
    ///
    /// Succeeds once `f` stops matching, rewinding its failed attempt; stops if the input runs
    /// out first.
    pub fn scan_zero_or_more(&mut self, mut f: impl FnMut(&mut Self) -> ScanResult) -> ScanResult {
        loop {
            let mark = self.curr;
            match f(self) {
                ScanResult::Full => {}
                ScanResult::None => {
                    self.curr = mark;
                    return ScanResult::Full;
                }
                ScanResult::Stop => return ScanResult::Stop,
            }
        }
    }

    /// Try `groups` in order from the current read position.
    ///
    /// The first full match wins. Without one, any group that ran out of input makes the result
    /// `Stop`, otherwise `None`; the read position is rewound in both cases.
    pub(crate) fn first_match(&mut self, groups: &[Group]) -> ScanOutcome {
        let entry = self.curr;
        let mut waiting = false;
        for group in groups {
            self.curr = entry;
            match group(self) {
                ScanOutcome::Full(op) => return ScanOutcome::Full(op),
                ScanOutcome::Stop => waiting = true,
                ScanOutcome::None => {}
            }
        }
        self.curr = entry;
        if waiting {
            ScanOutcome::Stop
        } else {
            ScanOutcome::None
        }
    }

    /// Try a binding table; same precedence rules as [`Scanner::first_match`].
    pub(crate) fn scan_bindings(&mut self, bindings: &[Binding]) -> ScanOutcome {
        let entry = self.curr;
        let mut waiting = false;
        for binding in bindings {
            self.curr = entry;
            match self.scan_pattern(binding.keys) {
                ScanResult::Full => {
                    return ScanOutcome::Full((binding.make)(&self.keys[entry..self.curr]));
                }
                ScanResult::Stop => waiting = true,
                ScanResult::None => {}
            }
        }
        self.curr = entry;
        if waiting {
            ScanOutcome::Stop
        } else {
            ScanOutcome::None
        }
    }

    /// A digit prefix followed by a match from `inner`, as [`Operation::Count`].
    pub(crate) fn scan_counted(&mut self, inner: &[Group]) -> ScanOutcome {
        let entry = self.curr;
        if self.scan_zero_or_more(Self::scan_digit) == ScanResult::Stop {
            self.curr = entry;
            return ScanOutcome::Stop;
        }
        if self.curr == entry {
            return ScanOutcome::None;
        }
        let count = self.keys[entry..self.curr]
            .iter()
            .filter_map(KeyEvent::digit)
            .fold(0usize, |acc, d| acc.saturating_mul(10).saturating_add(d as usize));
        match self.first_match(inner) {
            ScanOutcome::Full(op) => ScanOutcome::Full(op.counted(count)),
            other => {
                self.curr = entry;
                other
            }
        }
    }

    fn scan_pattern(&mut self, pats: &[Pat]) -> ScanResult {
        for pat in pats {
            let result = match *pat {
                Pat::Char(ch) => self.scan_char(ch),
                Pat::Key(code) => self.scan_key(code),
                Pat::Ctrl(ch) => self.scan_ctrl(ch),
                Pat::Text => self.scan_text_input(),
            };
            if result != ScanResult::Full {
                return result;
            }
        }
        ScanResult::Full
    }

    /// Consume every event before `index`.
    fn commit(&mut self, index: usize) {
        self.start = index.min(self.keys.len());
        self.curr = self.start;
        if self.start == self.keys.len() {
            self.clear();
        }
    }
}

fn groups(mode: Mode) -> &'static [Group] {
    match mode {
        Mode::Normal => bindings::NORMAL,
        Mode::Insert => bindings::INSERT,
        Mode::Visual => bindings::VISUAL,
        Mode::Tree => bindings::TREE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::parse_keys;

    fn scanner(keys: &str) -> Scanner {
        let mut scanner = Scanner::new();
        for key in parse_keys(keys) {
            scanner.push(key);
        }
        scanner
    }

    #[test]
    fn test_primitives_report_stop_at_end() {
        let mut s = scanner("a");
        assert_eq!(s.scan_char('b'), ScanResult::None);
        assert_eq!(s.scan_char('a'), ScanResult::Full);
        assert_eq!(s.scan_char('a'), ScanResult::Stop);
        assert!(s.is_end());
    }

    #[test]
    fn test_zero_or_more_rewinds_failed_attempt() {
        let mut s = scanner("12x");
        assert_eq!(s.scan_zero_or_more(Scanner::scan_digit), ScanResult::Full);
        assert_eq!(s.scanned().len(), 2);
        let mut s = scanner("12");
        assert_eq!(s.scan_zero_or_more(Scanner::scan_digit), ScanResult::Stop);
    }

    #[test]
    fn test_count_wraps_operation() {
        let mut s = scanner("123j");
        assert_eq!(
            s.scan(Mode::Normal),
            ScanOutcome::Full(Operation::CursorDown.counted(123))
        );
        assert!(s.is_drained());
    }

    #[test]
    fn test_count_ignores_leading_zeros() {
        let mut s = scanner("000123j");
        assert_eq!(
            s.scan(Mode::Normal),
            ScanOutcome::Full(Operation::CursorDown.counted(123))
        );
    }

    #[test]
    fn test_count_saturates() {
        let mut s = scanner("99999999999999999999999j");
        assert_eq!(
            s.scan(Mode::Normal),
            ScanOutcome::Full(Operation::CursorDown.counted(usize::MAX))
        );
    }

    #[test]
    fn test_stop_keeps_events() {
        let mut s = scanner("g");
        assert_eq!(s.scan(Mode::Normal), ScanOutcome::Stop);
        assert_eq!(s.input().len(), 1);
        s.push(KeyEvent::char('g'));
        assert_eq!(s.scan(Mode::Normal), ScanOutcome::Full(Operation::GoToLine));
        assert!(s.is_drained());
    }

    #[test]
    fn test_unrecognized_key_discards_one_event() {
        let mut s = scanner("Zj");
        assert_eq!(s.scan(Mode::Normal), ScanOutcome::None);
        assert_eq!(s.input(), &[KeyEvent::char('j')][..]);
        assert_eq!(s.scan(Mode::Normal), ScanOutcome::Full(Operation::CursorDown));
    }

    #[test]
    fn test_global_binding_in_every_mode() {
        for mode in [Mode::Normal, Mode::Insert, Mode::Visual, Mode::Tree] {
            let mut s = scanner("<C-c>");
            assert_eq!(s.scan(mode), ScanOutcome::Full(Operation::Quit));
        }
    }

    #[test]
    fn test_insert_mode_digits_are_text() {
        let mut s = scanner("3");
        assert_eq!(
            s.scan(Mode::Insert),
            ScanOutcome::Full(Operation::InsertText("3".to_string()))
        );
    }

    #[test]
    fn test_argument_binding() {
        let mut s = scanner("fx");
        assert_eq!(
            s.scan(Mode::Normal),
            ScanOutcome::Full(Operation::FindForward('x'))
        );
        let mut s = scanner("r");
        assert_eq!(s.scan(Mode::Normal), ScanOutcome::Stop);
    }
}
