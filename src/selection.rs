use std::collections::HashSet;

use crate::retention::{is_protected, is_protected_at};

/// Tags marked for bulk deletion within one open repository session.
///
/// The set is built against a fixed ordered tag list and enforces the
/// retention policy itself: protected tags never become members, whatever
/// the caller asks for. It must be dropped or cleared when the repository
/// changes so a stale pick never leaks into another repository.
pub struct Selection {
    ordered: Vec<String>,
    picked: HashSet<String>,
}

impl Selection {
    pub fn new(ordered: Vec<String>) -> Self {
        Self {
            ordered,
            picked: HashSet::new(),
        }
    }

    /// The ordered tag list this selection was opened against.
    pub fn ordered(&self) -> &[String] {
        &self.ordered
    }

    /// Flip membership of `tag`. Returns false (and changes nothing) when
    /// the tag is protected.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if is_protected(&self.ordered, tag) {
            return false;
        }
        if !self.picked.remove(tag) {
            self.picked.insert(tag.to_string());
        }
        true
    }

    /// Select every deletable tag, or clear when they are all already
    /// selected. A partial selection is promoted to the full set, never
    /// demoted.
    pub fn toggle_select_all(&mut self) {
        let deletable: HashSet<String> = self.deletable().into_iter().collect();
        if !deletable.is_empty() && self.picked == deletable {
            self.picked.clear();
        } else {
            self.picked = deletable;
        }
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.picked.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.picked.len()
    }

    /// All tags the retention policy allows deleting, in display order.
    pub fn deletable(&self) -> Vec<String> {
        self.ordered
            .iter()
            .enumerate()
            .filter(|(i, _)| !is_protected_at(*i))
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Selected tags in display order, for deterministic deletion order.
    pub fn selected_in_order(&self) -> Vec<String> {
        self.ordered
            .iter()
            .filter(|t| self.picked.contains(*t))
            .cloned()
            .collect()
    }
}
