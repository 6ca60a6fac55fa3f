//! Session Module
//!
//! The per-connection context every command and background task works
//! through: configuration, remote client, status cache, chat sink and the
//! deferred poster. Built once at startup and cloned cheaply into handlers.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{ShortKey, StatusCache};
use crate::config::Config;
use crate::error::Result;
use crate::models::StatusRecord;
use crate::persist::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::remote::StatusClient;
use crate::render::status_lines;
use crate::sink::MessageSink;
use crate::tasks::{DeferredPoster, NotificationPoller};

/// Status cache shared between handlers and background tasks.
///
/// Mutations take the write guard; remote calls are made before the guard
/// is taken, never while holding it.
pub type SharedCache = Arc<RwLock<StatusCache>>;

// == Session ==
#[derive(Clone)]
pub struct Session {
    pub config: Arc<Config>,
    pub client: Arc<dyn StatusClient>,
    pub cache: SharedCache,
    pub sink: Arc<dyn MessageSink>,
    pub poster: DeferredPoster,
}

impl Session {
    /// Creates a session around an already built cache.
    pub fn new(
        config: Config,
        client: Arc<dyn StatusClient>,
        cache: StatusCache,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let poster = DeferredPoster::new(
            config.post_delay(),
            client.clone(),
            cache.clone(),
            sink.clone(),
            config.output_prefix.clone(),
        );

        Self {
            config: Arc::new(config),
            client,
            cache,
            sink,
            poster,
        }
    }

    /// Creates a session whose cache is rehydrated from `store`.
    pub async fn connect(
        config: Config,
        client: Arc<dyn StatusClient>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        let cache = StatusCache::rehydrate(
            config.cache_limit,
            store,
            config.namespace.clone(),
            client.as_ref(),
        )
        .await;
        Self::new(config, client, cache, sink)
    }

    /// Creates a session with the store that suits `client`.
    ///
    /// The JSON file at `config.store_path` backs the cache only when the
    /// backend keeps its statuses. Otherwise every persisted key would fail
    /// to resolve on restart and rehydration would empty the file.
    pub async fn open(
        config: Config,
        client: Arc<dyn StatusClient>,
        sink: Arc<dyn MessageSink>,
    ) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = if client.is_durable() {
            Arc::new(JsonFileStore::open(config.store_path.clone())?)
        } else {
            warn!(
                path = %config.store_path.display(),
                "Backend keeps no statuses across restarts, status cache stays in memory"
            );
            Arc::new(MemoryStore::new())
        };

        Ok(Self::connect(config, client, store, sink).await)
    }

    pub fn prefix(&self) -> &str {
        &self.config.output_prefix
    }

    // == Remember ==
    /// Caches `status` under its short key.
    pub async fn remember(&self, status: StatusRecord) -> Result<ShortKey> {
        self.cache.write().await.insert_status(status)
    }

    /// Copies the status under `key` out of the cache.
    pub async fn lookup(&self, key: &ShortKey) -> Result<StatusRecord> {
        self.cache.read().await.get(key).cloned()
    }

    // == Announce ==
    /// Prints `status` to `destination` and caches it.
    ///
    /// A status without an identifier is rejected before anything is sent.
    pub async fn announce(&self, status: StatusRecord, destination: &str) -> Result<ShortKey> {
        let key = ShortKey::for_status(&status)?;

        for line in status_lines(&status, &key, self.prefix()) {
            self.sink.send(&line, destination);
        }

        debug!(%key, destination, "announced status");
        self.cache.write().await.put(key.clone(), status);
        Ok(key)
    }

    /// Poller that mirrors mentions into the configured notification channel.
    pub fn notification_poller(&self) -> NotificationPoller {
        NotificationPoller::new(self.clone(), self.config.notification_channel.clone())
    }
}
