//! Newline sequence helpers.
//!
//! A [`TextBuffer`](crate::TextBuffer) keeps its content as raw bytes and never normalizes
//! newlines. Instead every buffer carries one fixed newline sequence which is used both to split
//! the content into lines and whenever the editor inserts a line break.

use serde::{Deserialize, Serialize};

/// The newline sequence used by a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// The newline sequence of the host platform.
    pub const fn platform() -> Self {
        if cfg!(windows) { Self::Crlf } else { Self::Lf }
    }

    /// Detect the newline sequence of raw content.
    ///
    /// The first line break found decides: a `'\n'` preceded by `'\r'` means
    /// [`LineEnding::Crlf`], a bare `'\n'` means [`LineEnding::Lf`]. Returns `None` when the
    /// content has no line break at all.
    pub fn detect(content: &[u8]) -> Option<Self> {
        let lf = content.iter().position(|&b| b == b'\n')?;
        if lf > 0 && content[lf - 1] == b'\r' {
            Some(Self::Crlf)
        } else {
            Some(Self::Lf)
        }
    }

    /// Detect the newline sequence, falling back to `fallback` for single-line content.
    pub fn detect_or(content: &[u8], fallback: Self) -> Self {
        Self::detect(content).unwrap_or(fallback)
    }

    /// The bytes of the sequence.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::Crlf => b"\r\n",
        }
    }

    /// Length of the sequence in bytes.
    pub const fn len(self) -> usize {
        self.as_bytes().len()
    }

    /// Always `false`; a newline sequence is never empty.
    pub const fn is_empty(self) -> bool {
        false
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::platform()
    }
}
