//! Ordered show-item list and its mutation operations.
//!
//! The list is a dense, zero-based sequence of [`Entry`] values; insertion
//! order is the only order. Duplicate entries are structurally permitted —
//! addressing by value resolves to the first match.

use crate::entry::Entry;
use serde::{Deserialize, Serialize};

// ============================================================================
// SHOW-ITEM LIST
// ============================================================================

/// An ordered sequence of show-item entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowItemList {
    entries: Vec<Entry>,
}

impl ShowItemList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-delimited show-item string. Segments are trimmed and
    /// empty segments dropped, so a blank string yields an empty list.
    pub fn parse(showitem: &str) -> Self {
        Self {
            entries: showitem
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Entry::parse)
                .collect(),
        }
    }

    /// Serialize back to the comma-delimited store form. A single-entry list
    /// yields the bare entry string.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(Entry::to_raw)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entry at a list index, if in range.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // === Mutation ===

    /// Append an entry at the end.
    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Insert an entry at `index`, shifting successors right. Out-of-range
    /// indices clamp to an append.
    pub fn insert(&mut self, index: usize, entry: Entry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    /// Remove the entry at `index`. No-op when out of range.
    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }

    /// Remove the first entry whose serialized form equals `raw`. Removing a
    /// non-existent entry is a no-op, not an error.
    pub fn remove_first(&mut self, raw: &str) {
        if let Some(index) = self.position_of(raw) {
            self.entries.remove(index);
        }
    }

    /// Remove ALL entries whose plain-field name or div/palette label starts
    /// with `prefix`. Prefix matching is the deliberate, loose contract here.
    pub fn remove_by_prefix(&mut self, prefix: &str) {
        self.entries.retain(|entry| {
            let subject = match entry {
                Entry::Field { name, .. } => name,
                Entry::Div { label } => label,
                Entry::PaletteRef { label, .. } => label,
            };
            !subject.starts_with(prefix)
        });
    }

    // === Lookup ===

    /// Index of the first entry whose serialized form exactly equals `raw`.
    pub fn position_of(&self, raw: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.to_raw() == raw)
    }

    /// Whether an entry with exactly this serialized form exists.
    pub fn contains_raw(&self, raw: &str) -> bool {
        self.position_of(raw).is_some()
    }

    /// The nth divider, counting dividers only (not the full list index).
    pub fn div_at(&self, ordinal: usize) -> Option<&Entry> {
        self.entries.iter().filter(|e| e.is_div()).nth(ordinal)
    }

    /// First divider with the given label.
    pub fn div_by_label(&self, label: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| matches!(e, Entry::Div { label: l } if l == label))
    }

    /// First palette reference whose id equals `id`.
    pub fn palette_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| matches!(e, Entry::PaletteRef { id: i, .. } if i == id))
    }
}

impl FromIterator<Entry> for ShowItemList {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ShowItemList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
