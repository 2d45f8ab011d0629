use modal_core::{BufferError, LineEnding, Position, TextBuffer};
use pretty_assertions::assert_eq;

fn spans(buffer: &TextBuffer) -> Vec<(usize, usize)> {
    buffer.lines().iter().map(|l| (l.start, l.end)).collect()
}

#[test]
fn test_line_table_follows_edits() {
    let mut buffer = TextBuffer::new("one\ntwo\nthree", LineEnding::Lf);
    assert_eq!(spans(&buffer), vec![(0, 3), (4, 7), (8, 13)]);

    // Join the first two lines.
    buffer.erase(3, 4).unwrap();
    assert_eq!(spans(&buffer), vec![(0, 6), (7, 12)]);
    assert_eq!(buffer.line_bytes(0).unwrap(), b"onetwo");

    // Split the last one.
    buffer.insert(9, b"\n").unwrap();
    assert_eq!(spans(&buffer), vec![(0, 6), (7, 9), (10, 13)]);
    assert_eq!(buffer.version(), 2);
}

#[test]
fn test_detects_crlf_and_falls_back() {
    let crlf = TextBuffer::from_bytes("a\r\nb\nc", LineEnding::Lf);
    assert_eq!(crlf.newline(), LineEnding::Crlf);
    // The bare LF is ordinary content in a CRLF buffer.
    assert_eq!(spans(&crlf), vec![(0, 1), (3, 6)]);

    let flat = TextBuffer::from_bytes("abc", LineEnding::Crlf);
    assert_eq!(flat.newline(), LineEnding::Crlf);
    assert_eq!(flat.line_count(), 1);
}

#[test]
fn test_row_lookup_inside_crlf() {
    let buffer = TextBuffer::new("ab\r\ncd", LineEnding::Crlf);
    assert_eq!(buffer.row(2), 0);
    assert_eq!(buffer.row(3), 0);
    assert_eq!(buffer.row(4), 1);
    assert_eq!(buffer.row(100), 1);
    assert_eq!(buffer.next_line_start(0), 4);
    assert_eq!(buffer.next_line_start(1), 6);
}

#[test]
fn test_rune_coordinates_with_multibyte_text() {
    let buffer = TextBuffer::new("añb\n日本", LineEnding::Lf);
    assert_eq!(buffer.rune_coord(3).unwrap(), Position::new(0, 2));
    assert_eq!(buffer.coord(3).unwrap(), Position::new(0, 3));
    assert_eq!(buffer.index_from_rune_coord(Position::new(1, 1)).unwrap(), 8);
    assert_eq!(buffer.line_width(1).unwrap(), 2);
    // Past the width of the last line resolves to the content length.
    assert_eq!(
        buffer.index_from_rune_coord(Position::new(1, 9)).unwrap(),
        buffer.len()
    );
}

#[test]
fn test_errors_leave_buffer_untouched() {
    let mut buffer = TextBuffer::new("abc", LineEnding::Lf);
    assert_eq!(
        buffer.edit(2, 1, b"x"),
        Err(BufferError::IndexOutOfBounds {
            start: 2,
            end: 1,
            len: 3
        })
    );
    assert_eq!(
        buffer.line_bytes(1),
        Err(BufferError::LineOutOfRange {
            row: 1,
            line_count: 1
        })
    );
    assert_eq!(
        buffer.index_from_rune_coord(Position::new(4, 0)),
        Err(BufferError::CoordOutOfRange { row: 4, col: 0 })
    );
    assert_eq!(buffer.content(), b"abc");
    assert_eq!(buffer.version(), 0);
}

#[test]
fn test_invalid_utf8_is_kept_verbatim() {
    let mut buffer = TextBuffer::new(vec![b'a', 0xff, b'b'], LineEnding::Lf);
    assert_eq!(buffer.line_width(0).unwrap(), 3);
    buffer.insert(1, b"-").unwrap();
    assert_eq!(buffer.content(), &[b'a', b'-', 0xff, b'b']);
    assert_eq!(buffer.text_lossy(), "a-\u{fffd}b");
}
