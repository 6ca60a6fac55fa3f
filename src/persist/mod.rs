//! Durable Store Module
//!
//! Namespaced key-value persistence used to mirror the status cache across
//! restarts.
//!
//! # Backends
//! - `MemoryStore`: process-local, for tests and throwaway runs
//! - `JsonFileStore`: one JSON document on disk, rewritten atomically

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::Result;

// == Key-Value Store ==
/// Synchronous namespaced key-value store.
///
/// Each call is expected to be durable on its own once it returns `Ok`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `(namespace, key)`.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>>;

    /// Writes `value` under `(namespace, key)`, replacing any previous value.
    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<()>;

    /// Removes `(namespace, key)`. Removing a missing key is not an error.
    fn delete(&self, namespace: &str, key: &str) -> Result<()>;
}
