//! Order-preserving counting.
//!
//! Tie-breaks in the dashboard (top district, call-type ranking) follow the
//! order in which keys were first seen, so counts are kept in an
//! association list with a side index rather than in a hash map.

use std::collections::HashMap;

/// Counts keys, remembering first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl OrderedCounter {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments `key`, appending it if unseen.
    pub fn add(&mut self, key: &str) {
        if let Some(&pos) = self.index.get(key) {
            self.entries[pos].1 += 1;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), 1));
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-occurrence order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }

    /// Entries by count descending; equal counts keep first-occurrence
    /// order.
    #[must_use]
    pub fn ranked(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// The first key with the highest count.
    #[must_use]
    pub fn leader(&self) -> Option<&str> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(key, _)| key.as_str())
    }
}

impl<'a> FromIterator<&'a str> for OrderedCounter {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut counter = Self::new();
        for key in iter {
            counter.add(key);
        }
        counter
    }
}
