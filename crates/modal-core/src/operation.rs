//! Operations produced by the [`Scanner`](crate::Scanner) and run by the
//! [`Editor`](crate::Editor).

use std::fmt;

/// Input mode. Decides which key bindings are active and how carets are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Navigation and commands; carets sit on characters.
    #[default]
    Normal,
    /// Text entry; carets sit between characters.
    Insert,
    /// Character-wise selection between caret and anchor.
    Visual,
    /// Selection of syntax tree nodes.
    Tree,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual => "VISUAL",
            Self::Tree => "TREE",
        })
    }
}

/// A unit of editor behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Does nothing.
    None,
    /// Ask the host to quit.
    Quit,
    /// Run `op` `count` times, or pass `count` as its argument for line jumps.
    Count {
        /// Numeric prefix.
        count: usize,
        /// Wrapped operation.
        op: Box<Operation>,
    },

    /// Enter normal mode.
    NormalMode,
    /// Enter insert mode before the cursor.
    InsertBeforeCursor,
    /// Enter insert mode after the cursor.
    InsertAfterCursor,
    /// Enter insert mode at the first non-blank of the line.
    InsertAtLineStart,
    /// Enter insert mode at the end of the line.
    InsertAtLineEnd,
    /// Open a line below and enter insert mode.
    InsertLineBelow,
    /// Open a line above and enter insert mode.
    InsertLineAbove,
    /// Enter insert mode at the start of the selection.
    InsertSelectionStart,
    /// Enter insert mode after the end of the selection.
    InsertSelectionEnd,
    /// Enter visual mode anchored at the cursor.
    VisualMode,
    /// Enter tree mode on the node around the cursor or selection.
    TreeMode,

    /// One character left.
    CursorLeft,
    /// One character right.
    CursorRight,
    /// One line up.
    CursorUp,
    /// One line down.
    CursorDown,
    /// Start of the next word.
    WordStartNext,
    /// Start of the current or previous word.
    WordStartPrev,
    /// End of the current or next word.
    WordEndNext,
    /// End of the previous word.
    WordEndPrev,
    /// Start of the line.
    LineStart,
    /// First non-blank of the line.
    LineTextStart,
    /// End of the line.
    LineEnd,
    /// First line, or line `count` under a count.
    GoToLine,
    /// Last line, or line `count` under a count.
    GoToLastLine,
    /// Next occurrence of a character on the line.
    FindForward(char),
    /// Previous occurrence of a character on the line.
    FindBackward(char),
    /// Exchange cursor and anchor.
    SwapCursorAnchor,

    /// Insert text at the cursor.
    InsertText(String),
    /// Insert the configured tab text.
    InsertTab,
    /// Insert a newline sequence.
    InsertNewLine,
    /// Erase the character under (normal) or after (insert) the cursor.
    EraseRune,
    /// Erase the character before the cursor.
    EraseRunePrev,
    /// Erase back to the start of the previous word.
    EraseWordPrev,
    /// Erase the current line.
    EraseLine,
    /// Replace the character under the cursor.
    ReplaceRune(char),
    /// Erase the selection and return to normal mode.
    EraseSelection,
    /// Erase the selection and enter insert mode.
    ReplaceSelection,
    /// Copy the current line into the register.
    CopyLine,
    /// Copy the selection into the register.
    CopySelection,
    /// Paste the register after the cursor (below the line for whole lines).
    Paste,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,

    /// Select the parent node.
    NodeParent,
    /// Select the first child node.
    NodeFirstChild,
    /// Select the previous sibling node.
    NodePrevSibling,
    /// Select the next sibling node.
    NodeNextSibling,
    /// Select the first sibling node.
    NodeFirstSibling,
    /// Select the last sibling node.
    NodeLastSibling,
    /// Swap the node with its previous sibling.
    SwapNodePrev,
    /// Swap the node with its next sibling.
    SwapNodeNext,
}

impl Operation {
    /// Wrap in a repeat count.
    pub fn counted(self, count: usize) -> Self {
        Self::Count {
            count,
            op: Box::new(self),
        }
    }

    /// Whether running the operation can change the buffer.
    pub fn is_edit(&self) -> bool {
        match self {
            Self::Count { op, .. } => op.is_edit(),
            Self::InsertLineBelow
            | Self::InsertLineAbove
            | Self::InsertText(_)
            | Self::InsertTab
            | Self::InsertNewLine
            | Self::EraseRune
            | Self::EraseRunePrev
            | Self::EraseWordPrev
            | Self::EraseLine
            | Self::ReplaceRune(_)
            | Self::EraseSelection
            | Self::ReplaceSelection
            | Self::Paste
            | Self::Undo
            | Self::Redo
            | Self::SwapNodePrev
            | Self::SwapNodeNext => true,
            _ => false,
        }
    }

    /// Whether the operation continues an insert-mode typing run.
    pub(crate) fn extends_typing_run(&self) -> bool {
        matches!(
            self,
            Self::InsertText(_)
                | Self::InsertTab
                | Self::InsertNewLine
                | Self::EraseRune
                | Self::EraseRunePrev
                | Self::EraseWordPrev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_edit_sees_through_count() {
        assert!(Operation::EraseLine.counted(3).is_edit());
        assert!(!Operation::CursorDown.counted(3).is_edit());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Insert.to_string(), "INSERT");
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
