//! Syntax tree collaborator used by tree mode.
//!
//! The editor does not parse anything itself. A host plugs in a [`SyntaxTree`] (typically backed
//! by an incremental parser) with [`Editor::set_syntax_tree`](crate::Editor::set_syntax_tree);
//! the editor forwards every buffer edit to it and asks it for node ranges when navigating.

use std::ops::Range;

use crate::buffer::BufferEdit;

/// A node of the syntax tree, identified by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    /// Identifier assigned by the tree; only meaningful to the tree that produced it.
    pub id: u64,
    /// First byte of the node.
    pub start: usize,
    /// One past the last byte of the node.
    pub end: usize,
}

impl SyntaxNode {
    /// Byte range of the node.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the node spans no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Structural view of the buffer content.
pub trait SyntaxTree {
    /// Smallest named node covering `range`.
    fn node_at(&self, range: Range<usize>) -> Option<SyntaxNode>;

    /// Parent of `node`.
    fn parent(&self, node: &SyntaxNode) -> Option<SyntaxNode>;

    /// First child of `node`.
    fn first_child(&self, node: &SyntaxNode) -> Option<SyntaxNode>;

    /// Next sibling of `node`.
    fn next_sibling(&self, node: &SyntaxNode) -> Option<SyntaxNode>;

    /// Previous sibling of `node`.
    fn prev_sibling(&self, node: &SyntaxNode) -> Option<SyntaxNode>;

    /// Bring the tree in sync after `edit`; `content` is the buffer after the edit.
    fn edit(&mut self, edit: &BufferEdit, content: &[u8]);

    /// First sibling of `node`, `node` itself if it has no previous sibling.
    fn first_sibling(&self, node: &SyntaxNode) -> SyntaxNode {
        let mut node = *node;
        while let Some(prev) = self.prev_sibling(&node) {
            node = prev;
        }
        node
    }

    /// Last sibling of `node`, `node` itself if it has no next sibling.
    fn last_sibling(&self, node: &SyntaxNode) -> SyntaxNode {
        let mut node = *node;
        while let Some(next) = self.next_sibling(&node) {
            node = next;
        }
        node
    }
}
