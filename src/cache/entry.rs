//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and the value that is
//! mirrored to the durable store for each of them.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::StatusRecord;

// == Cache Entry ==
/// A cached status with its insertion metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached status
    pub status: StatusRecord,
    /// When the status was last put under its key
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(status: StatusRecord) -> Self {
        Self {
            status,
            inserted_at: Utc::now(),
        }
    }

    // == Persisted Value ==
    /// The durable form of this entry: its permalink.
    ///
    /// That is all that's needed to search the status up again on restart.
    pub fn persisted_value(&self) -> Value {
        Value::String(self.status.url.clone())
    }

    /// Seconds since the entry was inserted.
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.inserted_at).num_seconds().max(0)
    }
}

/// Reads a permalink back out of a durable value.
pub fn url_from_persisted(value: &Value) -> Option<&str> {
    value.as_str().filter(|url| !url.is_empty())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let status = StatusRecord::new("1", "https://social.example/@a/1", "a", "hi");
        let entry = CacheEntry::new(status.clone());

        assert_eq!(entry.status, status);
        assert!(entry.age_secs() <= 1);
    }

    #[test]
    fn test_persisted_value_is_url() {
        let status = StatusRecord::new("1", "https://social.example/@a/1", "a", "hi");
        let entry = CacheEntry::new(status);

        let value = entry.persisted_value();
        assert_eq!(url_from_persisted(&value), Some("https://social.example/@a/1"));
    }

    #[test]
    fn test_url_from_malformed_value() {
        assert_eq!(url_from_persisted(&Value::Null), None);
        assert_eq!(url_from_persisted(&Value::String(String::new())), None);
        assert_eq!(url_from_persisted(&serde_json::json!(["a"])), None);
    }
}
