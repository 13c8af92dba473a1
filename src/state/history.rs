//! Focus History - LIFO record of previous focus holders.
//!
//! Entries are weak: the history never keeps an element alive. An entry whose
//! element has been detached (or released and its slot reused) is dropped
//! when it is reached, and restoration does not fall through to older entries.

use crate::surface::Surface;
use crate::types::ElementId;

/// Ordered record of prior focus holders.
#[derive(Debug, Default, Clone)]
pub struct FocusHistory {
    entries: Vec<ElementId>,
    limit: Option<usize>,
}

impl FocusHistory {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// History that drops its oldest entry beyond `limit`.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[ElementId] {
        &self.entries
    }

    /// Push an entry. Consecutive duplicates are kept.
    pub fn push(&mut self, element: ElementId) {
        self.entries.push(element);
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
    }

    /// Remove and return the newest entry
    pub fn pop(&mut self) -> Option<ElementId> {
        self.entries.pop()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Optionally record the current focus holder, then focus `element`.
    ///
    /// Nothing is recorded when no element currently has focus.
    pub fn record_and_focus<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        element: ElementId,
        add_to_history: bool,
        scroll_into_view: bool,
    ) {
        if add_to_history {
            if let Some(current) = surface.active_element() {
                self.push(current);
            }
        }
        surface.focus(element);
        if scroll_into_view {
            surface.scroll_into_view(element);
        }
    }

    /// Pop exactly one entry and focus it if it is still attached.
    ///
    /// Returns true when focus moved. A stale entry is discarded and focus
    /// is left untouched.
    pub fn restore<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let Some(entry) = self.pop() else {
            return false;
        };
        if !surface.is_attached(entry) {
            tracing::trace!(%entry, "discarding stale focus history entry");
            return false;
        }
        surface.focus(entry);
        tracing::debug!(%entry, "focus restored from history");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    fn setup() -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let buttons = (0..3)
            .map(|i| doc.append(root, Element::button(&format!("b{i}"))).unwrap())
            .collect();
        (doc, buttons)
    }

    #[test]
    fn test_record_then_restore() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);

        history.record_and_focus(&mut doc, b[1], true, true);
        assert_eq!(doc.active_element(), Some(b[1]));
        assert_eq!(doc.last_scrolled(), Some(b[1]));
        assert_eq!(history.entries(), &[b[0]]);

        assert!(history.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(b[0]));
        assert!(history.is_empty());
    }

    #[test]
    fn test_no_record_without_active_element() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();

        history.record_and_focus(&mut doc, b[0], true, false);
        assert!(history.is_empty());
        assert_eq!(doc.last_scrolled(), None);
    }

    #[test]
    fn test_record_flag_off() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);

        history.record_and_focus(&mut doc, b[1], false, true);
        assert!(history.is_empty());
        assert_eq!(doc.active_element(), Some(b[1]));
    }

    #[test]
    fn test_stale_entry_discarded_without_cascade() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);
        history.record_and_focus(&mut doc, b[1], true, false);
        history.record_and_focus(&mut doc, b[2], true, false);
        assert_eq!(history.entries(), &[b[0], b[1]]);

        doc.release(b[1]);

        // Stale entry popped, focus unchanged, older entry untouched
        assert!(!history.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(b[2]));
        assert_eq!(history.entries(), &[b[0]]);

        assert!(history.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(b[0]));
    }

    #[test]
    fn test_recycled_slot_is_not_restored() {
        let (mut doc, b) = setup();
        let root = doc.root().unwrap();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);
        history.record_and_focus(&mut doc, b[1], true, false);

        doc.release(b[0]);
        let reused = doc.append(root, Element::button("new")).unwrap();
        assert_eq!(reused.index(), b[0].index());

        assert!(!history.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(b[1]));
    }

    #[test]
    fn test_duplicates_kept() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);
        history.record_and_focus(&mut doc, b[0], true, false);
        history.record_and_focus(&mut doc, b[0], true, false);
        assert_eq!(history.entries(), &[b[0], b[0]]);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::with_limit(Some(2));
        doc.focus(b[0]);
        history.record_and_focus(&mut doc, b[1], true, false);
        history.record_and_focus(&mut doc, b[2], true, false);
        history.record_and_focus(&mut doc, b[0], true, false);
        assert_eq!(history.entries(), &[b[1], b[2]]);
    }

    #[test]
    fn test_clear_and_empty_restore() {
        let (mut doc, b) = setup();
        let mut history = FocusHistory::new();
        doc.focus(b[0]);
        history.record_and_focus(&mut doc, b[1], true, false);
        history.clear();
        assert!(!history.restore(&mut doc));
        assert_eq!(doc.active_element(), Some(b[1]));
    }
}
