//! Pending store and snapshot types for the dispatcher

use std::collections::{BTreeMap, VecDeque};

/// Per-priority-level FIFO queues of waiting items
///
/// Levels are created lazily on first push and persist with empty queues;
/// only the tracked maximum is refreshed when a level drains. Selection
/// always recomputes the highest non-empty level directly from the map, so
/// the tracked value is a last-known reading for introspection, never a
/// correctness input.
#[derive(Debug)]
pub(crate) struct PendingStore<T> {
    levels: BTreeMap<u32, VecDeque<T>>,
    len: usize,
    highest: u32,
}

impl<T> PendingStore<T> {
    pub(crate) fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            len: 0,
            highest: 0,
        }
    }

    /// Append an item to its level's queue, creating the level on first use
    pub(crate) fn push(&mut self, priority: u32, item: T) {
        self.levels.entry(priority).or_default().push_back(item);
        self.len += 1;
        self.highest = self.highest.max(priority);
    }

    /// Pop the oldest item from the highest non-empty level
    pub(crate) fn pop_highest(&mut self) -> Option<(u32, T)> {
        let priority = self
            .levels
            .iter()
            .rev()
            .find(|(_, queue)| !queue.is_empty())
            .map(|(&priority, _)| priority)?;

        let item = self.levels.get_mut(&priority)?.pop_front()?;
        self.len -= 1;

        if self.levels.get(&priority).is_some_and(|queue| queue.is_empty()) {
            // The level drained; refresh the tracked maximum from the levels
            // that still have pending items. Keeps the last-known value when
            // nothing is pending (stale-safe, only read for introspection).
            if let Some((&next, _)) = self.levels.iter().rev().find(|(_, queue)| !queue.is_empty()) {
                self.highest = next;
            }
        } else {
            self.highest = priority;
        }

        Some((priority, item))
    }

    /// Total pending items across all levels
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last-recorded maximum priority (may be stale once its queue drains)
    pub(crate) fn highest(&self) -> u32 {
        self.highest
    }

    /// Pending items at the given priority or higher
    pub(crate) fn at_or_above(&self, priority: u32) -> usize {
        self.levels.range(priority..).map(|(_, queue)| queue.len()).sum()
    }
}

/// Statistics for the dispatcher
#[derive(Debug, Default, Clone)]
pub struct DispatcherStats {
    pub total_submitted: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub peak_concurrent: usize,
    pub peak_queue_depth: usize,
}

/// Point-in-time snapshot of dispatcher occupancy
#[derive(Debug, Clone)]
pub struct DispatcherState {
    /// Worker invocations currently in flight
    pub running: usize,
    /// Items waiting in the pending store
    pub queued: usize,
    pub stats: DispatcherStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fifo_within_level() {
        let mut store = PendingStore::new();
        store.push(0, "a");
        store.push(0, "b");
        store.push(0, "c");

        assert_eq!(store.pop_highest(), Some((0, "a")));
        assert_eq!(store.pop_highest(), Some((0, "b")));
        assert_eq!(store.pop_highest(), Some((0, "c")));
        assert_eq!(store.pop_highest(), None);
    }

    #[test]
    fn test_higher_level_drains_first() {
        let mut store = PendingStore::new();
        store.push(0, "low-1");
        store.push(2, "high");
        store.push(0, "low-2");
        store.push(1, "mid");

        assert_eq!(store.pop_highest(), Some((2, "high")));
        assert_eq!(store.pop_highest(), Some((1, "mid")));
        assert_eq!(store.pop_highest(), Some((0, "low-1")));
        assert_eq!(store.pop_highest(), Some((0, "low-2")));
    }

    #[test]
    fn test_empty_level_persists_and_reuses() {
        let mut store = PendingStore::new();
        store.push(3, "first");
        assert_eq!(store.pop_highest(), Some((3, "first")));
        assert!(store.is_empty());

        store.push(3, "second");
        assert_eq!(store.len(), 1);
        assert_eq!(store.pop_highest(), Some((3, "second")));
    }

    #[test]
    fn test_at_or_above_counts_equal_and_higher() {
        let mut store = PendingStore::new();
        store.push(0, "a");
        store.push(0, "b");
        store.push(1, "c");
        store.push(2, "d");

        assert_eq!(store.at_or_above(0), 4);
        assert_eq!(store.at_or_above(1), 2);
        assert_eq!(store.at_or_above(2), 1);
        assert_eq!(store.at_or_above(3), 0);
    }

    #[test]
    fn test_highest_refreshes_when_level_drains() {
        let mut store = PendingStore::new();
        store.push(5, "high");
        store.push(1, "low");
        assert_eq!(store.highest(), 5);

        store.pop_highest();
        assert_eq!(store.highest(), 1);
    }

    #[test]
    fn test_highest_stays_stale_when_store_drains() {
        let mut store = PendingStore::new();
        store.push(7, "only");
        store.pop_highest();

        assert!(store.is_empty());
        assert_eq!(store.highest(), 7);
    }

    proptest! {
        /// Items drain grouped by priority (descending), FIFO inside each group
        #[test]
        fn prop_pop_order_respects_priority_then_arrival(
            priorities in prop::collection::vec(0u32..8, 0..64)
        ) {
            let mut store = PendingStore::new();
            for (seq, &priority) in priorities.iter().enumerate() {
                store.push(priority, seq);
            }

            let mut expected: Vec<(u32, usize)> =
                priorities.iter().copied().enumerate().map(|(seq, p)| (p, seq)).collect();
            // Stable sort keeps arrival order within a priority level
            expected.sort_by_key(|&(priority, _)| std::cmp::Reverse(priority));

            let mut drained = Vec::new();
            while let Some(entry) = store.pop_highest() {
                drained.push(entry);
            }

            prop_assert_eq!(drained, expected);
            prop_assert!(store.is_empty());
        }
    }
}
