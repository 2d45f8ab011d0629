//! Linear undo/redo history.
//!
//! The history is a list of [`Change`]s with a `current` marker. Entries before the marker can
//! be undone, entries from the marker on can be redone. Pushing a new change discards every
//! redoable entry, so the history never branches.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::change::Change;

/// How emptiness of a change is judged when pushing with `skip_if_empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// [`Change::is_empty`]: a composite is empty as soon as one step is empty.
    #[default]
    AnySubChange,
    /// [`Change::is_noop`]: a composite is empty only when every step is empty.
    AllSubChanges,
}

impl EmptyPolicy {
    /// Judge `change`.
    pub fn is_empty(self, change: &Change) -> bool {
        match self {
            Self::AnySubChange => change.is_empty(),
            Self::AllSubChanges => change.is_noop(),
        }
    }
}

/// Linear change history.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Change>,
    current: usize,
    policy: EmptyPolicy,
}

impl History {
    /// Create an empty history using the default [`EmptyPolicy`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history with an explicit emptiness policy.
    pub fn with_policy(policy: EmptyPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Record `change` at the marker, discarding any redoable entries.
    ///
    /// With `skip_if_empty` an empty change (per the policy) is dropped and nothing else is
    /// touched. Returns whether the change was recorded.
    pub fn push(&mut self, change: Change, skip_if_empty: bool) -> bool {
        if skip_if_empty && self.policy.is_empty(&change) {
            trace!("history push skipped: empty change");
            return false;
        }
        self.entries.truncate(self.current);
        self.entries.push(change);
        self.current = self.entries.len();
        trace!(len = self.entries.len(), "history push");
        true
    }

    /// Step back, returning the change to undo (apply its reverse).
    pub fn back(&mut self) -> Option<&Change> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        trace!(current = self.current, "history back");
        self.entries.get(self.current)
    }

    /// Step forward, returning the change to redo (apply it as is).
    pub fn forward(&mut self) -> Option<&Change> {
        let change = self.entries.get(self.current)?;
        self.current += 1;
        trace!(current = self.current, "history forward");
        Some(change)
    }

    /// Position of the marker.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether [`History::back`] would return a change.
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    /// Whether [`History::forward`] would return a change.
    pub fn can_redo(&self) -> bool {
        self.current < self.entries.len()
    }

    /// The active emptiness policy.
    pub fn policy(&self) -> EmptyPolicy {
        self.policy
    }

    /// Forget every change.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(text: &str) -> Change {
        Change::insert(0, text)
    }

    #[test]
    fn test_back_and_forward_walk_the_list() {
        let mut history = History::new();
        for text in ["a", "b", "c"] {
            assert!(history.push(insert(text), true));
        }
        assert_eq!(history.back(), Some(&insert("c")));
        assert_eq!(history.back(), Some(&insert("b")));
        assert_eq!(history.forward(), Some(&insert("b")));
        assert_eq!(history.current(), 2);
    }

    #[test]
    fn test_empty_history_has_nothing_to_walk() {
        let mut history = History::new();
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_after_back_discards_redo() {
        let mut history = History::new();
        history.push(insert("a"), true);
        history.push(insert("b"), true);
        history.back();
        history.push(insert("c"), true);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.back(), Some(&insert("c")));
        assert_eq!(history.back(), Some(&insert("a")));
    }

    #[test]
    fn test_skip_if_empty() {
        let mut history = History::new();
        history.push(insert("a"), true);
        history.back();
        assert!(!history.push(Change::Empty, true));
        // A skipped push keeps the redo entries.
        assert!(history.can_redo());
        assert!(history.push(Change::Empty, false));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_policy_decides_composite_emptiness() {
        let partly_empty = Change::Composite(vec![insert("a"), Change::Empty]);
        let mut literal = History::new();
        assert!(!literal.push(partly_empty.clone(), true));

        let mut lenient = History::with_policy(EmptyPolicy::AllSubChanges);
        assert!(lenient.push(partly_empty, true));
    }
}
