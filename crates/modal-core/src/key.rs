//! Key events fed to the [`Scanner`](crate::Scanner).
//!
//! Events are terminal-agnostic. With the `crossterm` feature enabled,
//! [`KeyEvent::from_crossterm`] converts crossterm events at the input boundary.
//!
//! [`parse_keys`] turns vim-style notation (`"3dd"`, `"ihi<Esc>"`, `"<C-r>"`) into events, which
//! keeps tests and scripted input readable.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Meta.
        const ALT = 1 << 2;
    }
}

/// The pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key; the character already reflects Shift.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Esc,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Tab.
    Tab,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key.
    F(u8),
}

/// One key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key.
    pub code: KeyCode,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create an event.
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// An unmodified key.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// An unmodified character key.
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// A character key with Control held.
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// Whether Control or Alt is held.
    pub fn has_command_modifier(&self) -> bool {
        self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT)
    }

    /// The typed character, if this key inserts text.
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch) if !self.has_command_modifier() && !ch.is_control() => Some(ch),
            _ => None,
        }
    }

    /// The digit value of an unmodified digit key.
    pub fn digit(&self) -> Option<u32> {
        self.text_char().and_then(|ch| ch.to_digit(10))
    }

    /// Convert a crossterm key event. Releases and keys without a counterpart yield `None`.
    #[cfg(feature = "crossterm")]
    pub fn from_crossterm(event: &crossterm::event::KeyEvent) -> Option<Self> {
        use crossterm::event::{KeyCode as Ct, KeyEventKind, KeyModifiers};

        if event.kind == KeyEventKind::Release {
            return None;
        }
        let code = match event.code {
            Ct::Char(ch) => KeyCode::Char(ch),
            Ct::Enter => KeyCode::Enter,
            Ct::Esc => KeyCode::Esc,
            Ct::Backspace => KeyCode::Backspace,
            Ct::Delete => KeyCode::Delete,
            Ct::Tab => KeyCode::Tab,
            Ct::Left => KeyCode::Left,
            Ct::Right => KeyCode::Right,
            Ct::Up => KeyCode::Up,
            Ct::Down => KeyCode::Down,
            Ct::Home => KeyCode::Home,
            Ct::End => KeyCode::End,
            Ct::PageUp => KeyCode::PageUp,
            Ct::PageDown => KeyCode::PageDown,
            Ct::F(n) => KeyCode::F(n),
            _ => return None,
        };
        let mut modifiers = Modifiers::empty();
        // Shift is already folded into the character.
        if event.modifiers.contains(KeyModifiers::SHIFT) && !matches!(code, KeyCode::Char(_)) {
            modifiers |= Modifiers::SHIFT;
        }
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            modifiers |= Modifiers::CTRL;
        }
        if event.modifiers.contains(KeyModifiers::ALT) {
            modifiers |= Modifiers::ALT;
        }
        Some(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char(ch) if self.modifiers.is_empty() => return write!(f, "{ch}"),
            KeyCode::Char(ch) => ch.to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{n}"),
        };
        f.write_str("<")?;
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("A-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("S-")?;
        }
        write!(f, "{name}>")
    }
}

/// Parse vim-style key notation.
///
/// Plain characters map to character keys. Bracketed names (`<Esc>`, `<CR>`, `<BS>`, `<Del>`,
/// `<Tab>`, arrows, `<Home>`, `<End>`, `<F1>`, `<lt>`) map to special keys, with optional
/// `C-`, `A-` and `S-` prefixes. An unrecognized bracket sequence is taken literally.
pub fn parse_keys(input: &str) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    let mut rest = input;
    while let Some(ch) = rest.chars().next() {
        if ch == '<'
            && let Some(close) = rest.find('>')
            && let Some(key) = parse_named(&rest[1..close])
        {
            keys.push(key);
            rest = &rest[close + 1..];
            continue;
        }
        keys.push(KeyEvent::char(ch));
        rest = &rest[ch.len_utf8()..];
    }
    keys
}

fn parse_named(name: &str) -> Option<KeyEvent> {
    let mut modifiers = Modifiers::empty();
    let mut name = name;
    loop {
        let (flag, stripped) = match name.get(..2) {
            Some("C-") | Some("c-") => (Modifiers::CTRL, &name[2..]),
            Some("A-") | Some("M-") => (Modifiers::ALT, &name[2..]),
            Some("S-") => (Modifiers::SHIFT, &name[2..]),
            _ => break,
        };
        if stripped.is_empty() {
            break;
        }
        modifiers |= flag;
        name = stripped;
    }

    let mut chars = name.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(ch), None) if !modifiers.is_empty() => KeyCode::Char(ch),
        _ => match name.to_ascii_lowercase().as_str() {
            "esc" => KeyCode::Esc,
            "cr" | "enter" | "return" => KeyCode::Enter,
            "bs" | "backspace" => KeyCode::Backspace,
            "del" | "delete" => KeyCode::Delete,
            "tab" => KeyCode::Tab,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "lt" => KeyCode::Char('<'),
            "space" => KeyCode::Char(' '),
            other => match other.strip_prefix('f').and_then(|n| n.parse().ok()) {
                Some(n) => KeyCode::F(n),
                None => return None,
            },
        },
    };
    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_named() {
        assert_eq!(
            parse_keys("3d<Esc>"),
            vec![
                KeyEvent::char('3'),
                KeyEvent::char('d'),
                KeyEvent::plain(KeyCode::Esc)
            ]
        );
        assert_eq!(parse_keys("<C-r>"), vec![KeyEvent::ctrl('r')]);
        assert_eq!(parse_keys("<lt>"), vec![KeyEvent::char('<')]);
    }

    #[test]
    fn test_unknown_bracket_is_literal() {
        let keys = parse_keys("<x>");
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], KeyEvent::char('<'));
    }

    #[test]
    fn test_text_char_and_digit() {
        assert_eq!(KeyEvent::char('ż').text_char(), Some('ż'));
        assert_eq!(KeyEvent::ctrl('w').text_char(), None);
        assert_eq!(KeyEvent::char('7').digit(), Some(7));
        assert_eq!(KeyEvent::plain(KeyCode::Enter).digit(), None);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["a", "<Esc>", "<C-r>", "<lt>", "<CR>", "<F12>"] {
            let keys = parse_keys(text);
            assert_eq!(keys[0].to_string(), text);
        }
    }

    #[cfg(feature = "crossterm")]
    #[test]
    fn test_from_crossterm_folds_shift() {
        use crossterm::event::{KeyCode as Ct, KeyEvent as CtEvent, KeyModifiers};

        let event = CtEvent::new(Ct::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(KeyEvent::from_crossterm(&event), Some(KeyEvent::char('G')));
        let event = CtEvent::new(Ct::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(KeyEvent::from_crossterm(&event), Some(KeyEvent::ctrl('r')));
    }
}
