#![warn(missing_docs)]
//! Modal Core - Headless Editing Kernel for Modal Terminal Editors
//!
//! # Overview
//!
//! `modal-core` is the editing core of a vim/kakoune-style modal editor. It owns the text, the
//! cursors and the undo history, and turns raw key presses into editing operations. It does not
//! draw anything and does not talk to a terminal; hosts feed it keys and read back the buffer,
//! the cursor and the mode.
//!
//! # Core Features
//!
//! - **Byte Buffer with Line Table**: byte-indexed content with a line table rebuilt on each edit
//! - **Two Cursor Flavours**: character positioning for normal mode, edge positioning for insert
//! - **Change Algebra**: replaces, composites and swaps that apply, reverse and shift positions
//! - **Linear History**: undo/redo with empty-change policies and coalesced typing runs
//! - **Key Scanner**: incremental matching of key sequences with repeat counts
//! - **Tree Mode**: structural selection through a pluggable syntax tree
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (operation executor)                │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Scanner (keys → operations)                │  ← Input
//! ├─────────────────────────────────────────────┤
//! │  History / Change algebra                   │  ← Undo & Redo
//! ├─────────────────────────────────────────────┤
//! │  Cursor (motions, word classes, search)     │  ← Navigation
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (bytes + line table)            │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use modal_core::{Editor, Mode, Position, Scanner};
//!
//! let mut editor = Editor::new("package main\n");
//! let mut scanner = Scanner::new();
//!
//! editor.feed(&mut scanner, "A<C-w>fmt<Esc>").unwrap();
//! assert_eq!(editor.text(), "package fmt\n");
//! assert_eq!(editor.mode(), Mode::Normal);
//! assert_eq!(editor.cursor().pos(), Position::new(0, 10));
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Byte buffer and line table
//! - [`cursor`] - Cursors and motions
//! - [`change`] - Reversible changes
//! - [`history`] - Undo/redo history
//! - [`key`] - Key events and key notation
//! - [`scanner`] - Key-sequence scanner
//! - [`operation`] - Modes and operations
//! - [`editor`] - Operation executor
//! - [`syntax`] - Syntax tree collaborator
//! - [`config`] - Configuration

pub mod buffer;
pub mod change;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod history;
pub mod key;
pub mod line_ending;
pub mod operation;
pub mod scanner;
pub mod syntax;
mod text;

pub use buffer::{BufferEdit, BufferError, Line, Position, TextBuffer};
pub use change::{Change, ChangeContext, Replace};
pub use config::{ConfigError, CoreConfig};
pub use cursor::{Caret, CharClass, Cursor, CursorError};
pub use editor::{EditCallback, Editor, Register};
pub use history::{EmptyPolicy, History};
pub use key::{KeyCode, KeyEvent, Modifiers, parse_keys};
pub use line_ending::LineEnding;
pub use operation::{Mode, Operation};
pub use scanner::{ScanOutcome, ScanResult, Scanner};
pub use syntax::{SyntaxNode, SyntaxTree};
