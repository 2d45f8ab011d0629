use modal_core::{KeyEvent, Mode, Operation, ScanOutcome, Scanner, parse_keys};
use pretty_assertions::assert_eq;

fn feed(scanner: &mut Scanner, keys: &str) {
    for key in parse_keys(keys) {
        scanner.push(key);
    }
}

/// Scan until the scanner needs more input, collecting completed operations.
fn drain(scanner: &mut Scanner, mode: Mode) -> Vec<Operation> {
    let mut ops = Vec::new();
    while !scanner.is_drained() {
        match scanner.scan(mode) {
            ScanOutcome::Full(op) => ops.push(op),
            ScanOutcome::None => {}
            ScanOutcome::Stop => break,
        }
    }
    ops
}

#[test]
fn test_normal_mode_stream() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "3jdwx");
    assert_eq!(
        drain(&mut scanner, Mode::Normal),
        vec![
            Operation::CursorDown.counted(3),
            // "d" followed by "w" is not a binding; the "d" is dropped.
            Operation::WordStartNext,
            Operation::EraseRune,
        ]
    );
    assert!(scanner.is_drained());
}

#[test]
fn test_pending_sequence_completes_with_later_input() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "1");
    feed(&mut scanner, "2g");
    assert_eq!(drain(&mut scanner, Mode::Normal), vec![]);
    assert_eq!(scanner.input().len(), 3);

    feed(&mut scanner, "g");
    assert_eq!(
        drain(&mut scanner, Mode::Normal),
        vec![Operation::GoToLine.counted(12)]
    );
}

#[test]
fn test_argument_bindings() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "fxF(r<lt>");
    assert_eq!(
        drain(&mut scanner, Mode::Normal),
        vec![
            Operation::FindForward('x'),
            Operation::FindBackward('('),
            Operation::ReplaceRune('<'),
        ]
    );
}

#[test]
fn test_insert_mode_treats_everything_typed_as_text() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "dd3<CR><Esc>");
    assert_eq!(
        drain(&mut scanner, Mode::Insert),
        vec![
            Operation::InsertText("d".to_string()),
            Operation::InsertText("d".to_string()),
            Operation::InsertText("3".to_string()),
            Operation::InsertNewLine,
            Operation::NormalMode,
        ]
    );
}

#[test]
fn test_quit_is_bound_in_every_mode() {
    for mode in [Mode::Normal, Mode::Insert, Mode::Visual, Mode::Tree] {
        let mut scanner = Scanner::new();
        scanner.push(KeyEvent::ctrl('c'));
        assert_eq!(drain(&mut scanner, mode), vec![Operation::Quit], "{mode}");
    }
}

#[test]
fn test_visual_and_tree_counts() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "3wd");
    assert_eq!(
        drain(&mut scanner, Mode::Visual),
        vec![
            Operation::WordStartNext.counted(3),
            Operation::EraseSelection
        ]
    );

    feed(&mut scanner, "2Lk");
    assert_eq!(
        drain(&mut scanner, Mode::Tree),
        vec![Operation::SwapNodeNext.counted(2), Operation::NodeParent]
    );
}

#[test]
fn test_unbound_keys_are_discarded_one_at_a_time() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "QZ<F5>i");
    assert_eq!(
        drain(&mut scanner, Mode::Normal),
        vec![Operation::InsertBeforeCursor]
    );
}

#[test]
fn test_leading_zero_counts_then_motion() {
    let mut scanner = Scanner::new();
    feed(&mut scanner, "0");
    assert_eq!(scanner.scan(Mode::Normal), ScanOutcome::Stop);
    feed(&mut scanner, "$");
    assert_eq!(
        scanner.scan(Mode::Normal),
        ScanOutcome::Full(Operation::LineEnd.counted(0))
    );
}
