//! Key binding tables, one per group.

use super::{Group, ScanOutcome, Scanner};
use crate::key::{KeyCode, KeyEvent};
use crate::operation::Operation;

/// One element of a key sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Pat {
    /// A typed character.
    Char(char),
    /// A key without Control or Alt.
    Key(KeyCode),
    /// A character with Control.
    Ctrl(char),
    /// Any typed character; its value is the binding's argument.
    Text,
}

/// A key sequence and the operation it builds from the matched events.
pub(crate) struct Binding {
    pub(crate) keys: &'static [Pat],
    pub(crate) make: fn(&[KeyEvent]) -> Operation,
}

macro_rules! bind {
    ([$($pat:expr),+] => |$keys:ident| $op:expr) => {
        Binding { keys: &[$($pat),+], make: |$keys| $op }
    };
    ([$($pat:expr),+] => $op:expr) => {
        Binding { keys: &[$($pat),+], make: |_| $op }
    };
}

/// The character argument of a binding ending in [`Pat::Text`].
fn arg(keys: &[KeyEvent]) -> char {
    keys.last()
        .and_then(KeyEvent::text_char)
        .unwrap_or_default()
}

static GLOBAL_BINDINGS: &[Binding] = &[bind!([Pat::Ctrl('c')] => Operation::Quit)];

static MOVEMENT_BINDINGS: &[Binding] = &[
    bind!([Pat::Char('h')] => Operation::CursorLeft),
    bind!([Pat::Key(KeyCode::Left)] => Operation::CursorLeft),
    bind!([Pat::Char('l')] => Operation::CursorRight),
    bind!([Pat::Key(KeyCode::Right)] => Operation::CursorRight),
    bind!([Pat::Char('k')] => Operation::CursorUp),
    bind!([Pat::Key(KeyCode::Up)] => Operation::CursorUp),
    bind!([Pat::Char('j')] => Operation::CursorDown),
    bind!([Pat::Key(KeyCode::Down)] => Operation::CursorDown),
    bind!([Pat::Char('w')] => Operation::WordStartNext),
    bind!([Pat::Char('b')] => Operation::WordStartPrev),
    bind!([Pat::Char('e')] => Operation::WordEndNext),
    bind!([Pat::Char('g'), Pat::Char('e')] => Operation::WordEndPrev),
    bind!([Pat::Char('g'), Pat::Char('g')] => Operation::GoToLine),
    bind!([Pat::Char('G')] => Operation::GoToLastLine),
    bind!([Pat::Key(KeyCode::Home)] => Operation::LineStart),
    bind!([Pat::Char('^')] => Operation::LineTextStart),
    bind!([Pat::Char('_')] => Operation::LineTextStart),
    bind!([Pat::Char('$')] => Operation::LineEnd),
    bind!([Pat::Key(KeyCode::End)] => Operation::LineEnd),
    bind!([Pat::Char('f'), Pat::Text] => |keys| Operation::FindForward(arg(keys))),
    bind!([Pat::Char('F'), Pat::Text] => |keys| Operation::FindBackward(arg(keys))),
];

static NORMAL_BINDINGS: &[Binding] = &[
    bind!([Pat::Char('i')] => Operation::InsertBeforeCursor),
    bind!([Pat::Char('a')] => Operation::InsertAfterCursor),
    bind!([Pat::Char('I')] => Operation::InsertAtLineStart),
    bind!([Pat::Char('A')] => Operation::InsertAtLineEnd),
    bind!([Pat::Char('o')] => Operation::InsertLineBelow),
    bind!([Pat::Char('O')] => Operation::InsertLineAbove),
    bind!([Pat::Char('v')] => Operation::VisualMode),
    bind!([Pat::Char('t')] => Operation::TreeMode),
    bind!([Pat::Char('x')] => Operation::EraseRune),
    bind!([Pat::Key(KeyCode::Delete)] => Operation::EraseRune),
    bind!([Pat::Char('X')] => Operation::EraseRunePrev),
    bind!([Pat::Char('d'), Pat::Char('d')] => Operation::EraseLine),
    bind!([Pat::Char('y'), Pat::Char('y')] => Operation::CopyLine),
    bind!([Pat::Char('p')] => Operation::Paste),
    bind!([Pat::Char('r'), Pat::Text] => |keys| Operation::ReplaceRune(arg(keys))),
    bind!([Pat::Char('u')] => Operation::Undo),
    bind!([Pat::Ctrl('r')] => Operation::Redo),
];

static INSERT_BINDINGS: &[Binding] = &[
    bind!([Pat::Key(KeyCode::Esc)] => Operation::NormalMode),
    bind!([Pat::Key(KeyCode::Backspace)] => Operation::EraseRunePrev),
    bind!([Pat::Key(KeyCode::Delete)] => Operation::EraseRune),
    bind!([Pat::Key(KeyCode::Enter)] => Operation::InsertNewLine),
    bind!([Pat::Key(KeyCode::Tab)] => Operation::InsertTab),
    bind!([Pat::Ctrl('w')] => Operation::EraseWordPrev),
    bind!([Pat::Key(KeyCode::Left)] => Operation::CursorLeft),
    bind!([Pat::Key(KeyCode::Right)] => Operation::CursorRight),
    bind!([Pat::Key(KeyCode::Up)] => Operation::CursorUp),
    bind!([Pat::Key(KeyCode::Down)] => Operation::CursorDown),
    bind!([Pat::Key(KeyCode::Home)] => Operation::LineStart),
    bind!([Pat::Key(KeyCode::End)] => Operation::LineEnd),
    bind!([Pat::Text] => |keys| Operation::InsertText(arg(keys).to_string())),
];

static VISUAL_BINDINGS: &[Binding] = &[
    bind!([Pat::Key(KeyCode::Esc)] => Operation::NormalMode),
    bind!([Pat::Char('v')] => Operation::NormalMode),
    bind!([Pat::Char('d')] => Operation::EraseSelection),
    bind!([Pat::Char('x')] => Operation::EraseSelection),
    bind!([Pat::Char('y')] => Operation::CopySelection),
    bind!([Pat::Char('s')] => Operation::ReplaceSelection),
    bind!([Pat::Char('o')] => Operation::SwapCursorAnchor),
    bind!([Pat::Char('t')] => Operation::TreeMode),
    bind!([Pat::Char('i')] => Operation::InsertSelectionStart),
    bind!([Pat::Char('a')] => Operation::InsertSelectionEnd),
];

static TREE_BINDINGS: &[Binding] = &[
    bind!([Pat::Key(KeyCode::Esc)] => Operation::NormalMode),
    bind!([Pat::Char('t')] => Operation::NormalMode),
    bind!([Pat::Char('k')] => Operation::NodeParent),
    bind!([Pat::Char('j')] => Operation::NodeFirstChild),
    bind!([Pat::Char('h')] => Operation::NodePrevSibling),
    bind!([Pat::Char('l')] => Operation::NodeNextSibling),
    bind!([Pat::Char('_')] => Operation::NodeFirstSibling),
    bind!([Pat::Char('$')] => Operation::NodeLastSibling),
    bind!([Pat::Char('H')] => Operation::SwapNodePrev),
    bind!([Pat::Char('L')] => Operation::SwapNodeNext),
    bind!([Pat::Char('d')] => Operation::EraseSelection),
    bind!([Pat::Char('s')] => Operation::ReplaceSelection),
    bind!([Pat::Char('y')] => Operation::CopySelection),
    bind!([Pat::Char('v')] => Operation::VisualMode),
    bind!([Pat::Char('u')] => Operation::Undo),
    bind!([Pat::Ctrl('r')] => Operation::Redo),
];

fn global(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(GLOBAL_BINDINGS)
}

fn movement(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(MOVEMENT_BINDINGS)
}

fn normal_commands(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(NORMAL_BINDINGS)
}

fn insert_commands(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(INSERT_BINDINGS)
}

fn visual_commands(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(VISUAL_BINDINGS)
}

fn tree_commands(s: &mut Scanner) -> ScanOutcome {
    s.scan_bindings(TREE_BINDINGS)
}

fn normal_counted(s: &mut Scanner) -> ScanOutcome {
    s.scan_counted(&[movement, normal_commands])
}

fn visual_counted(s: &mut Scanner) -> ScanOutcome {
    s.scan_counted(&[movement, visual_commands])
}

fn tree_counted(s: &mut Scanner) -> ScanOutcome {
    s.scan_counted(&[tree_commands])
}

pub(super) static NORMAL: &[Group] = &[global, movement, normal_commands, normal_counted];
pub(super) static INSERT: &[Group] = &[global, insert_commands];
pub(super) static VISUAL: &[Group] = &[global, movement, visual_commands, visual_counted];
pub(super) static TREE: &[Group] = &[global, tree_commands, tree_counted];
