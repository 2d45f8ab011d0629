//! UTF-8 helpers over raw byte content.
//!
//! Buffer content is not guaranteed to be valid UTF-8. Every invalid byte decodes as
//! [`char::REPLACEMENT_CHARACTER`] with a width of one byte, so stepping over content always
//! makes progress.

/// Decode the code point starting at `bytes[0]`.
///
/// Returns the decoded character and its width in bytes; `(REPLACEMENT_CHARACTER, 0)` for empty
/// input.
pub(crate) fn decode_rune(bytes: &[u8]) -> (char, usize) {
    let Some(&lead) = bytes.first() else {
        return (char::REPLACEMENT_CHARACTER, 0);
    };
    let width = match lead {
        0x00..=0x7F => return (lead as char, 1),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };
    if bytes.len() < width {
        return (char::REPLACEMENT_CHARACTER, 1);
    }
    match std::str::from_utf8(&bytes[..width]) {
        Ok(s) => s
            .chars()
            .next()
            .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, width)),
        Err(_) => (char::REPLACEMENT_CHARACTER, 1),
    }
}

/// Decode the code point ending at the end of `bytes`.
pub(crate) fn decode_last_rune(bytes: &[u8]) -> (char, usize) {
    if bytes.is_empty() {
        return (char::REPLACEMENT_CHARACTER, 0);
    }
    let floor = bytes.len().saturating_sub(4);
    let mut start = bytes.len() - 1;
    while start > floor && is_continuation(bytes[start]) {
        start -= 1;
    }
    let (ch, width) = decode_rune(&bytes[start..]);
    if start + width == bytes.len() {
        (ch, width)
    } else {
        (char::REPLACEMENT_CHARACTER, 1)
    }
}

/// Number of code points in `bytes`.
pub(crate) fn rune_count(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        i += decode_rune(&bytes[i..]).1;
        count += 1;
    }
    count
}

/// Byte offset of the `n`-th code point of `bytes`, or `None` past the end.
pub(crate) fn rune_offset(bytes: &[u8], n: usize) -> Option<usize> {
    let mut i = 0;
    for _ in 0..n {
        if i >= bytes.len() {
            return None;
        }
        i += decode_rune(&bytes[i..]).1;
    }
    Some(i)
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
