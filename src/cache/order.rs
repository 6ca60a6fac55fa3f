//! Insertion Order Module
//!
//! Tracks the order in which keys entered the cache for FIFO eviction.

use std::collections::VecDeque;

use crate::cache::ShortKey;

// == Insertion Order ==
/// Tracks insertion order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insert
/// - Back = Newest insert
///
/// Lookups never reorder keys. Re-inserting a key moves it to the back.
#[derive(Debug, Default, Clone)]
pub struct InsertionOrder {
    order: VecDeque<ShortKey>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Marks a key as the newest insert.
    ///
    /// If the key is already tracked it is moved to the back.
    pub fn push(&mut self, key: &ShortKey) {
        self.remove(key);
        self.order.push_back(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &ShortKey) {
        self.order.retain(|k| k != key);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<ShortKey> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&ShortKey> {
        self.order.front()
    }

    /// Snapshot of all keys, oldest first.
    pub fn keys(&self) -> Vec<ShortKey> {
        self.order.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &ShortKey) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ShortKey {
        ShortKey::from(s)
    }

    #[test]
    fn test_order_new() {
        let order = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
        assert_eq!(order.peek_oldest(), None);
    }

    #[test]
    fn test_push_new_keys() {
        let mut order = InsertionOrder::new();

        order.push(&key("AAAA"));
        order.push(&key("BBBB"));
        order.push(&key("CCCC"));

        assert_eq!(order.len(), 3);
        assert_eq!(order.peek_oldest(), Some(&key("AAAA")));
        assert_eq!(order.keys(), vec![key("AAAA"), key("BBBB"), key("CCCC")]);
    }

    #[test]
    fn test_push_existing_key_moves_to_back() {
        let mut order = InsertionOrder::new();

        order.push(&key("AAAA"));
        order.push(&key("BBBB"));
        order.push(&key("CCCC"));
        order.push(&key("AAAA"));

        assert_eq!(order.len(), 3);
        assert_eq!(order.keys(), vec![key("BBBB"), key("CCCC"), key("AAAA")]);
    }

    #[test]
    fn test_pop_oldest() {
        let mut order = InsertionOrder::new();

        order.push(&key("AAAA"));
        order.push(&key("BBBB"));

        assert_eq!(order.pop_oldest(), Some(key("AAAA")));
        assert_eq!(order.pop_oldest(), Some(key("BBBB")));
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut order = InsertionOrder::new();

        order.push(&key("AAAA"));
        order.push(&key("BBBB"));
        order.push(&key("CCCC"));

        order.remove(&key("BBBB"));
        // Removing an unknown key is a no-op
        order.remove(&key("ZZZZ"));

        assert_eq!(order.len(), 2);
        assert!(!order.contains(&key("BBBB")));
        assert!(order.contains(&key("AAAA")));
        assert!(order.contains(&key("CCCC")));
    }
}
