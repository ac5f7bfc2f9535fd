//! Composite-key lookup table
//!
//! A map keyed by a sequence of parts, with key equality defined by
//! element-wise equality of the parts rather than identity, and iteration in
//! insertion order. Self-contained; the dispatcher does not depend on it.

use indexmap::IndexMap;
use std::hash::Hash;

/// Insertion-ordered map over composite keys
///
/// Two keys are the same entry when their parts compare equal element-wise,
/// so distinct key instances with equal parts hit the same slot.
#[derive(Debug, Clone)]
pub struct CompositeIndex<K, V> {
    entries: IndexMap<Vec<K>, V>,
}

impl<K, V> CompositeIndex<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the value stored under a key with these parts
    pub fn get(&self, key: &[K]) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or overwrite, returning the previous value if any
    ///
    /// Overwriting keeps the entry's original position in iteration order.
    pub fn set(&mut self, key: Vec<K>, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn has(&self, key: &[K]) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, preserving the order of the remaining ones
    pub fn delete(&mut self, key: &[K]) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&[K], &V)> {
        self.entries.iter().map(|(key, value)| (key.as_slice(), value))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &[K]> {
        self.entries.keys().map(|key| key.as_slice())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

impl<K, V> Default for CompositeIndex<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}
