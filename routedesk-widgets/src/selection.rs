//! Selection state shared by the multi-select and the data table.
//!
//! Selection is keyed by string IDs and keeps them in the order they were
//! selected, so a change notification can carry the full list without
//! consulting the option or row set behind it. IDs are never pruned when that
//! set is replaced: a selected ID may point at an option that has not loaded yet.

use std::collections::HashSet;

/// Result of a selection mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Membership changed.
    Changed,
    /// The request was valid but membership already matched it.
    Unchanged,
    /// Selecting would exceed the limit. Nothing changed.
    LimitReached(usize),
    /// The request would remove a fixed ID (or hit a disabled widget). Nothing changed.
    Rejected,
}

impl SelectionOutcome {
    /// Check if membership changed.
    pub fn is_changed(&self) -> bool {
        matches!(self, SelectionOutcome::Changed)
    }
}

/// Insertion-ordered, ID-based selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    /// Selected IDs in selection order.
    order: Vec<String>,
    /// Membership index over `order`.
    members: HashSet<String>,
    /// IDs the user is not allowed to remove.
    fixed: HashSet<String>,
    /// Upper bound on the number of selected IDs (None = unlimited).
    max_selected: Option<usize>,
}

impl SelectionModel {
    /// Create an empty, unlimited selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty selection that holds at most `max` IDs.
    pub fn with_max_selected(max: usize) -> Self {
        Self {
            max_selected: Some(max),
            ..Default::default()
        }
    }

    /// Get the selection limit.
    pub fn max_selected(&self) -> Option<usize> {
        self.max_selected
    }

    /// Set the selection limit.
    ///
    /// Lowering the limit below the current size does not drop anything; it
    /// only blocks further selections.
    pub fn set_max_selected(&mut self, max: Option<usize>) {
        self.max_selected = max;
    }

    /// Selected IDs in selection order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Check if an ID is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Number of selected IDs.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if an ID is marked fixed.
    pub fn is_fixed(&self, id: &str) -> bool {
        self.fixed.contains(id)
    }

    /// Mark or unmark an ID as fixed. Works whether or not it is selected.
    pub fn set_fixed(&mut self, id: &str, fixed: bool) {
        if fixed {
            self.fixed.insert(id.to_string());
        } else {
            self.fixed.remove(id);
        }
    }

    fn at_limit(&self) -> Option<usize> {
        self.max_selected.filter(|max| self.order.len() >= *max)
    }

    /// Add an ID to the selection.
    pub fn select(&mut self, id: &str) -> SelectionOutcome {
        if self.members.contains(id) {
            return SelectionOutcome::Unchanged;
        }
        if let Some(max) = self.at_limit() {
            return SelectionOutcome::LimitReached(max);
        }
        self.members.insert(id.to_string());
        self.order.push(id.to_string());
        SelectionOutcome::Changed
    }

    /// Remove an ID from the selection unless it is fixed.
    pub fn remove(&mut self, id: &str) -> SelectionOutcome {
        if !self.members.contains(id) {
            return SelectionOutcome::Unchanged;
        }
        if self.fixed.contains(id) {
            return SelectionOutcome::Rejected;
        }
        self.members.remove(id);
        self.order.retain(|i| i != id);
        SelectionOutcome::Changed
    }

    /// Flip membership of an ID.
    pub fn toggle(&mut self, id: &str) -> SelectionOutcome {
        if self.members.contains(id) {
            self.remove(id)
        } else {
            self.select(id)
        }
    }

    /// Select every ID in `ids` that is not selected yet, as one step.
    ///
    /// If the additions would cross the limit nothing is selected.
    pub fn select_many(&mut self, ids: &[String]) -> SelectionOutcome {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut additions: Vec<&String> = Vec::new();
        for id in ids {
            if !self.members.contains(id) && seen.insert(id.as_str()) {
                additions.push(id);
            }
        }
        if additions.is_empty() {
            return SelectionOutcome::Unchanged;
        }
        if let Some(max) = self.max_selected
            && self.order.len() + additions.len() > max
        {
            return SelectionOutcome::LimitReached(max);
        }
        for id in additions {
            self.members.insert(id.clone());
            self.order.push(id.clone());
        }
        SelectionOutcome::Changed
    }

    /// Deselect every non-fixed ID in `ids`, as one step.
    pub fn deselect_many(&mut self, ids: &[String]) -> SelectionOutcome {
        let removable: HashSet<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| self.members.contains(*id) && !self.fixed.contains(*id))
            .collect();
        if removable.is_empty() {
            return SelectionOutcome::Unchanged;
        }
        self.order.retain(|id| !removable.contains(id.as_str()));
        self.members.retain(|id| !removable.contains(id.as_str()));
        SelectionOutcome::Changed
    }

    /// Replace membership wholesale with the given IDs.
    ///
    /// Used for controlled state pushed in by the host. Duplicates collapse to
    /// their first occurrence; the limit is not applied.
    pub fn replace_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order.clear();
        self.members.clear();
        for id in ids {
            let id = id.into();
            if self.members.insert(id.clone()) {
                self.order.push(id);
            }
        }
    }

    /// Clear the selection. With `keep_fixed`, fixed IDs stay selected.
    pub fn clear(&mut self, keep_fixed: bool) -> SelectionOutcome {
        let before = self.order.len();
        if keep_fixed {
            let fixed = &self.fixed;
            self.order.retain(|id| fixed.contains(id));
            self.members.retain(|id| fixed.contains(id));
        } else {
            self.order.clear();
            self.members.clear();
        }
        if self.order.len() == before {
            SelectionOutcome::Unchanged
        } else {
            SelectionOutcome::Changed
        }
    }
}
