use modal_core::{Cursor, CursorError, LineEnding, Position, TextBuffer};
use pretty_assertions::assert_eq;

const WORDS: &str = "abc (123)  !@\n    edf";

fn walk<'a>(
    buffer: &'a TextBuffer,
    from: usize,
    step: fn(Cursor<'a>) -> Cursor<'a>,
) -> Vec<usize> {
    let mut out = Vec::new();
    let mut cursor = Cursor::new(buffer, from, false);
    loop {
        let next = step(cursor);
        if next.index() == cursor.index() {
            return out;
        }
        out.push(next.index());
        cursor = next;
    }
}

#[test]
fn test_word_start_next() {
    let buffer = TextBuffer::new(WORDS, LineEnding::Lf);
    assert_eq!(walk(&buffer, 0, Cursor::word_start_next), vec![4, 5, 8, 11, 18]);
}

#[test]
fn test_word_end_next() {
    let buffer = TextBuffer::new(WORDS, LineEnding::Lf);
    assert_eq!(walk(&buffer, 0, Cursor::word_end_next), vec![2, 4, 7, 8, 12, 20]);
}

#[test]
fn test_word_start_prev() {
    let buffer = TextBuffer::new(WORDS, LineEnding::Lf);
    assert_eq!(
        walk(&buffer, 20, Cursor::word_start_prev),
        vec![18, 11, 8, 5, 4, 0]
    );
}

#[test]
fn test_word_end_prev() {
    let buffer = TextBuffer::new(WORDS, LineEnding::Lf);
    assert_eq!(walk(&buffer, 20, Cursor::word_end_prev), vec![12, 8, 7, 4, 2]);
}

#[test]
fn test_search_forward_and_backward() {
    let buffer = TextBuffer::new("hello world", LineEnding::Lf);
    let cursor = Cursor::new(&buffer, 0, false);

    let first = cursor.search_forward(b"o").unwrap();
    assert_eq!(first.index(), 4);
    let second = first.search_forward(b"o").unwrap();
    assert_eq!(second.index(), 7);
    assert_eq!(
        second.search_forward(b"o"),
        Err(CursorError::SequenceNotFound("o".to_string()))
    );

    assert_eq!(second.search_backward(b"o").unwrap().index(), 4);
    assert_eq!(second.search_backward(b"wor").unwrap().index(), 6);
    assert!(first.search_backward(b"o").is_err());
}

#[test]
fn test_search_is_not_bounded_by_lines() {
    let buffer = TextBuffer::new("ab\ncd\nab", LineEnding::Lf);
    let found = Cursor::new(&buffer, 0, false).search_forward(b"ab").unwrap();
    assert_eq!(found.pos(), Position::new(2, 0));
}

#[test]
fn test_walk_runes_across_lines_in_both_modes() {
    let buffer = TextBuffer::new("añ\n\nb", LineEnding::Lf);
    assert_eq!(walk(&buffer, 0, |c| c.as_char().rune_next()), vec![1, 4, 5]);
    assert_eq!(
        walk(&buffer, 0, |c| c.as_edge().rune_next()),
        vec![1, 3, 4, 5, 6]
    );
}

#[test]
fn test_vertical_moves_clip_and_keep_target_column() {
    let buffer = TextBuffer::new("long line\nab\nanother line", LineEnding::Lf);
    let start = Cursor::new(&buffer, 0, false).move_to_col(7);

    let down = start.vertical_shift(1, 7);
    assert_eq!(down.pos(), Position::new(1, 1));
    let again = down.vertical_shift(1, 7);
    assert_eq!(again.pos(), Position::new(2, 7));
    assert_eq!(again.vertical_shift(1, 7), again);
}

#[test]
fn test_line_text_start_skips_indentation() {
    let buffer = TextBuffer::new("  \tfoo\n   ", LineEnding::Lf);
    let cursor = Cursor::new(&buffer, 5, false);
    assert_eq!(cursor.to_line_text_start().index(), 3);
    assert_eq!(cursor.to_line_start().index(), 0);

    // A blank line has no text; the cursor ends on its last character.
    let blank = Cursor::new(&buffer, 8, false);
    assert_eq!(blank.to_line_text_start().index(), 9);
    assert_eq!(blank.as_edge().to_line_text_start().index(), 10);
}

#[test]
fn test_rune_prev_undoes_rune_next() {
    let buffer = TextBuffer::new("añ日\r\nb\r\n\r\nz", LineEnding::Crlf);
    for as_edge in [false, true] {
        let mut cursor = Cursor::new(&buffer, 0, as_edge);
        loop {
            let next = cursor.rune_next();
            if next == cursor {
                break;
            }
            assert_eq!(next.rune_prev(), cursor, "edge {as_edge} at {}", cursor.index());
            cursor = next;
        }
    }
}
