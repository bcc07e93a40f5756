//! Bounded most-recent-first trail with move-to-front deduplication

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Ordered, deduplicated trail capped at a fixed length
///
/// The front is the most recently touched entry. Membership checks go through
/// an index instead of scanning the trail.
#[derive(Debug, Clone)]
pub struct BoundedHistory<K, V> {
    entries: VecDeque<(K, V)>,
    index: HashSet<K>,
    capacity: usize,
}

impl<K, V> BoundedHistory<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty trail; a capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert or refresh an entry and move it to the front
    ///
    /// Returns the entry evicted from the back when the cap is exceeded.
    pub fn touch(&mut self, key: K, value: V) -> Option<(K, V)> {
        if !self.index.insert(key.clone()) {
            if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
                self.entries.remove(pos);
            }
        }
        self.entries.push_front((key, value));

        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_back()?;
            self.index.remove(&evicted.0);
            return Some(evicted);
        }
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.index.remove(key) {
            return None;
        }
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        self.entries.remove(pos).map(|(_, value)| value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        if !self.index.contains(key) {
            return None;
        }
        self.entries.iter().find(|(k, _)| k == key).map(|(_, value)| value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Keys, most recent first
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn front(&self) -> Option<&V> {
        self.entries.front().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(history: &BoundedHistory<u64, &'static str>) -> Vec<u64> {
        history.keys().copied().collect()
    }

    #[test]
    fn test_repeat_touch_moves_to_front() {
        let mut history = BoundedHistory::new(10);
        history.touch(5, "five");
        history.touch(6, "six");
        history.touch(5, "five again");

        assert_eq!(keys(&history), vec![5, 6]);
        assert_eq!(history.front(), Some(&"five again"));
    }

    #[test]
    fn test_same_key_twice_keeps_one_entry() {
        let mut history = BoundedHistory::new(10);
        history.touch(5, "a");
        history.touch(5, "a");
        assert_eq!(keys(&history), vec![5]);
    }

    #[test]
    fn test_cap_evicts_least_recently_touched() {
        let mut history = BoundedHistory::new(3);
        history.touch(1, "one");
        history.touch(2, "two");
        history.touch(3, "three");
        // Refreshing 1 makes 2 the oldest
        history.touch(1, "one");

        let evicted = history.touch(4, "four");
        assert_eq!(evicted, Some((2, "two")));
        assert_eq!(keys(&history), vec![4, 1, 3]);
        assert!(!history.contains(&2));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = BoundedHistory::new(5);
        history.touch(1, "one");
        history.touch(2, "two");

        assert_eq!(history.remove(&1), Some("one"));
        assert_eq!(history.remove(&1), None);
        assert_eq!(history.get(&2), Some(&"two"));

        history.clear();
        assert!(history.is_empty());
        assert!(!history.contains(&2));
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = BoundedHistory::new(0);
        history.touch(1, "one");
        assert_eq!(history.touch(2, "two"), Some((1, "one")));
        assert_eq!(keys(&history), vec![2]);
    }
}
