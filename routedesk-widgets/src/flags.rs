//! Per-row boolean flags carried beside a table's selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map of row ID to a boolean flag (e.g. "priority").
///
/// Independent of [`SelectionModel`](crate::selection::SelectionModel): a row
/// can be flagged without being selected. A missing entry reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagMap {
    flags: BTreeMap<String, bool>,
}

impl FlagMap {
    /// Create an empty flag map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an ID is flagged.
    pub fn is_flagged(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    /// Get the raw entry for an ID, distinguishing "unset" from `false`.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.flags.get(id).copied()
    }

    /// Set the flag for one ID, keeping every other entry.
    pub fn set(&mut self, id: impl Into<String>, value: bool) {
        self.flags.insert(id.into(), value);
    }

    /// Flip the flag for one ID. Returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let value = !self.is_flagged(id);
        self.flags.insert(id.to_string(), value);
        value
    }

    /// Replace every entry.
    pub fn replace_all(&mut self, other: FlagMap) {
        self.flags = other.flags;
    }

    /// IDs whose flag is `true`, in key order.
    pub fn flagged_ids(&self) -> Vec<String> {
        self.flags
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries (flagged or explicitly unflagged).
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl From<BTreeMap<String, bool>> for FlagMap {
    fn from(flags: BTreeMap<String, bool>) -> Self {
        Self { flags }
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
