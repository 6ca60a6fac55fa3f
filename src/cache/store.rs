//! Status Cache Module
//!
//! Bounded short-key → status map, mirrored to the durable store and
//! rebuilt from it (plus the remote service) at startup.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::entry::url_from_persisted;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder, ShortKey, KEYLIST_SLOT};
use crate::error::{BridgeError, Result};
use crate::models::StatusRecord;
use crate::persist::KeyValueStore;
use crate::remote::StatusClient;

// == Status Cache ==
/// Insertion-ordered status cache with a size bound and durable mirroring.
///
/// Durable layout inside `namespace`:
/// - `keylist`: JSON array of the cached keys, oldest first
/// - `<key>`: JSON string, the permalink of the status under that key
///
/// Eviction is strict FIFO: lookups never change the order, re-putting a
/// key moves it to the newest position.
pub struct StatusCache {
    /// Key-status storage
    entries: HashMap<ShortKey, CacheEntry>,
    /// Insertion order tracker
    order: InsertionOrder,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries kept
    capacity: usize,
    /// Durable mirror
    store: Arc<dyn KeyValueStore>,
    /// Durable namespace for keys and the key list
    namespace: String,
}

impl StatusCache {
    // == Constructor ==
    /// Creates an empty cache. Nothing is read from the store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of statuses kept
    /// * `store` - Durable mirror
    /// * `namespace` - Namespace for every durable record of this cache
    pub fn new(capacity: usize, store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity,
            store,
            namespace: namespace.into(),
        }
    }

    // == Rehydrate ==
    /// Rebuilds the cache from the durable store.
    ///
    /// Each persisted key's permalink is searched on the remote service and
    /// the first match is cached under the key, keeping the persisted order.
    /// Keys whose lookup fails or finds nothing are dropped along with their
    /// durable value. The size bound is applied afterwards, so a shrunk
    /// capacity evicts the oldest restored entries.
    pub async fn rehydrate(
        capacity: usize,
        store: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        client: &dyn StatusClient,
    ) -> Self {
        let mut cache = Self::new(capacity, store, namespace);

        let keys = cache.load_key_list();
        debug!(count = keys.len(), "rehydrating status cache");

        for key in keys {
            match cache.restore(&key, client).await {
                Some(status) => {
                    cache.entries.insert(key.clone(), CacheEntry::new(status));
                    cache.order.push(&key);
                    cache.stats.record_rehydrated();
                }
                None => {
                    cache.stats.record_dropped();
                    cache.forget_value(&key);
                }
            }
        }

        cache.enforce_capacity();

        info!(
            restored = cache.stats.rehydrated,
            dropped = cache.stats.dropped,
            cached = cache.len(),
            "status cache rehydrated"
        );
        cache
    }

    /// Looks up one persisted key on the remote service.
    async fn restore(&self, key: &ShortKey, client: &dyn StatusClient) -> Option<StatusRecord> {
        let url = match self.store.get(&self.namespace, key.as_str()) {
            Ok(Some(value)) => match url_from_persisted(&value) {
                Some(url) => url.to_string(),
                None => {
                    warn!(%key, "persisted value is not a url, dropping key");
                    return None;
                }
            },
            Ok(None) => {
                warn!(%key, "no persisted value for key, dropping it");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to read persisted value");
                return None;
            }
        };

        match client.search(&url).await {
            Ok(results) => {
                let first = results.statuses.into_iter().next();
                if first.is_none() {
                    debug!(%key, %url, "status no longer found remotely");
                }
                first
            }
            Err(e) => {
                warn!(%key, %url, error = %e, "remote lookup failed, dropping key");
                None
            }
        }
    }

    // == Get ==
    /// Returns the status under `key`. Never touches the order.
    pub fn get(&self, key: &ShortKey) -> Result<&StatusRecord> {
        self.entries
            .get(key)
            .map(|entry| &entry.status)
            .ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))
    }

    /// Returns the entry under `key`, with its insertion time.
    pub fn entry(&self, key: &ShortKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ShortKey) -> bool {
        self.entries.contains_key(key)
    }

    // == Put ==
    /// Stores `status` under `key` as the newest entry.
    ///
    /// The permalink is persisted first, then the entry is inserted (an
    /// existing key is overwritten and moved to the newest position), then
    /// the size bound is applied. Returns the keys evicted by this put.
    pub fn put(&mut self, key: ShortKey, status: StatusRecord) -> Vec<ShortKey> {
        let entry = CacheEntry::new(status);

        if let Err(e) = self
            .store
            .set(&self.namespace, key.as_str(), entry.persisted_value())
        {
            warn!(%key, error = %e, "failed to persist cache value");
        }

        self.entries.insert(key.clone(), entry);
        self.order.push(&key);
        self.stats.record_insert();

        self.enforce_capacity()
    }

    /// Derives the key for `status` and puts it.
    ///
    /// Fails with `InvalidInput` if the status has no identifier.
    pub fn insert_status(&mut self, status: StatusRecord) -> Result<ShortKey> {
        let key = ShortKey::for_status(&status)?;
        self.put(key.clone(), status);
        Ok(key)
    }

    // == Delete ==
    /// Removes `key` from the durable store, the key list and memory.
    ///
    /// Fails with `KeyNotFound` if the key isn't cached.
    pub fn delete(&mut self, key: &ShortKey) -> Result<StatusRecord> {
        if !self.contains(key) {
            return Err(BridgeError::KeyNotFound(key.to_string()));
        }

        self.forget_value(key);
        self.order.remove(key);
        self.persist_key_list();

        let entry = self
            .entries
            .remove(key)
            .ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))?;
        self.stats.record_deletion();
        self.stats.set_total_entries(self.entries.len());

        Ok(entry.status)
    }

    // == Enforce Capacity ==
    /// Evicts the oldest entries until the size bound holds, then rewrites
    /// the durable key list.
    fn enforce_capacity(&mut self) -> Vec<ShortKey> {
        let mut evicted = Vec::new();

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_oldest() else {
                break;
            };
            self.entries.remove(&oldest);
            self.forget_value(&oldest);
            self.stats.record_eviction();
            debug!(key = %oldest, "evicted oldest status");
            evicted.push(oldest);
        }

        self.persist_key_list();
        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Durable Helpers ==
    fn load_key_list(&self) -> Vec<ShortKey> {
        let value = match self.store.get(&self.namespace, KEYLIST_SLOT) {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted key list");
                return Vec::new();
            }
        };

        match serde_json::from_value::<Vec<ShortKey>>(value) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "persisted key list is malformed, starting empty");
                Vec::new()
            }
        }
    }

    fn persist_key_list(&self) {
        let keys: Vec<Value> = self
            .order
            .keys()
            .into_iter()
            .map(|key| Value::String(key.to_string()))
            .collect();

        if let Err(e) = self
            .store
            .set(&self.namespace, KEYLIST_SLOT, Value::Array(keys))
        {
            warn!(error = %e, "failed to persist key list");
        }
    }

    fn forget_value(&self, key: &ShortKey) {
        if let Err(e) = self.store.delete(&self.namespace, key.as_str()) {
            warn!(%key, error = %e, "failed to delete persisted value");
        }
    }

    // == Accessors ==
    /// Cached keys, oldest first.
    pub fn keys(&self) -> Vec<ShortKey> {
        self.order.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("keys", &self.order.keys())
            .field("capacity", &self.capacity)
            .field("namespace", &self.namespace)
            .finish()
    }
}
