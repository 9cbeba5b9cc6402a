//! Tag vocabularies backing autocomplete.
//!
//! Union-only: a value is added the first time it is typed into any record
//! and never pruned, even when the last record using it goes away. That
//! keeps autocomplete suggestions stable across edits.

use serde::{Deserialize, Serialize};

/// A growable set of free-text categorical values.
///
/// Storage keeps insertion order; callers get a lexicographically sorted
/// view only at the point of enumeration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TagSet {
    entries: Vec<String>,
}

impl TagSet {
    /// Add a value unless an exact (case-sensitive) match is already
    /// present. Returns whether the set changed, so callers know to refresh
    /// any dependent autocomplete source.
    pub fn ensure(&mut self, value: &str) -> bool {
        if value.is_empty() || self.entries.iter().any(|e| e == value) {
            return false;
        }
        self.entries.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|e| e == value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order (the persisted order).
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries sorted for display in an autocomplete list.
    pub fn sorted(&self) -> Vec<String> {
        let mut out = self.entries.clone();
        out.sort();
        out
    }
}

impl FromIterator<String> for TagSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = TagSet::default();
        for value in iter {
            set.ensure(&value);
        }
        set
    }
}

/// The three independent vocabularies the worksheet maintains.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagVocabulary {
    pub visit_type: TagSet,
    pub reason: TagSet,
    pub results_needed: TagSet,
}
