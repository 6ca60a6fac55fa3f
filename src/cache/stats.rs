//! Cache Statistics Module
//!
//! Tracks cache activity: inserts, evictions, deletions and rehydration results.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of puts (new keys and overwrites)
    pub inserts: u64,
    /// Number of entries evicted by the size bound
    pub evictions: u64,
    /// Number of explicit deletions
    pub deletions: u64,
    /// Number of entries restored from the durable store at startup
    pub rehydrated: u64,
    /// Number of persisted keys that couldn't be restored at startup
    pub dropped: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_deletion(&mut self) {
        self.deletions += 1;
    }

    pub fn record_rehydrated(&mut self) {
        self.rehydrated += 1;
    }

    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    // == Update Entry Count ==
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_record_counters() {
        let mut stats = CacheStats::new();
        stats.record_insert();
        stats.record_insert();
        stats.record_eviction();
        stats.record_deletion();
        stats.record_rehydrated();
        stats.record_dropped();
        stats.set_total_entries(7);

        assert_eq!(stats.inserts, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.deletions, 1);
        assert_eq!(stats.rehydrated, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.total_entries, 7);
    }
}
