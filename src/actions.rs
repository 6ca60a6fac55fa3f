//! Command Actions
//!
//! What each chat command does, independent of how it was issued. Errors
//! carry the message shown back to the issuer.

use tracing::{debug, info};

use crate::cache::ShortKey;
use crate::error::{BridgeError, Result};
use crate::models::{NewStatus, StatusRecord, TootRequest};
use crate::render::key_line;
use crate::session::Session;
use crate::tasks::PostOutcome;

/// A status found remotely and cached under `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub key: ShortKey,
    pub status: StatusRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteOutcome {
    pub key: ShortKey,
    pub muted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavouriteOutcome {
    pub key: ShortKey,
    pub favourited: bool,
    pub url: String,
}

impl Session {
    // == Toot ==
    /// Posts a toot, or a reply when `reply_to` names a cached status.
    ///
    /// Goes through the deferred poster, so with a delay configured the
    /// outcome is a ticket rather than a posted status.
    pub async fn toot(&self, request: TootRequest) -> Result<PostOutcome> {
        if let Some(message) = request.validate() {
            return Err(BridgeError::InvalidInput(message));
        }

        let in_reply_to = match request.reply_to.as_deref() {
            Some(reference) => {
                let key = ShortKey::from(reference);
                let parent = self.lookup(&key).await.map_err(|_| {
                    BridgeError::KeyNotFound(format!("{key}, nothing to reply to"))
                })?;
                Some(parent.id)
            }
            None => None,
        };

        let post = NewStatus {
            text: request.body(),
            sensitive: request.sensitive,
            visibility: request
                .visibility
                .unwrap_or(self.config.default_visibility),
            in_reply_to,
        };

        let outcome = self.poster.submit(post, request.channel.clone()).await?;
        if let (PostOutcome::Posted { key, status }, Some(channel)) = (&outcome, &request.channel) {
            self.sink
                .send(&key_line(key, &status.url, self.prefix()), channel);
        }
        Ok(outcome)
    }

    // == Delete ==
    /// Deletes the status under `key` remotely, then forgets it.
    pub async fn delete_toot(&self, key: &ShortKey) -> Result<StatusRecord> {
        let status = self.lookup(key).await?;

        self.client.delete(&status.id).await.map_err(|e| match e {
            BridgeError::RemoteNotFound(_) => {
                BridgeError::RemoteNotFound(format!("[{key}] cannot be deleted"))
            }
            other => other,
        })?;

        // The entry may have been evicted while the remote call was in flight.
        if let Err(e) = self.cache.write().await.delete(key) {
            debug!(%key, error = %e, "Deleted status already gone from cache");
        }

        info!(%key, id = %status.id, "Status deleted");
        Ok(status)
    }

    // == Search ==
    /// Looks `query` up remotely and caches the first match.
    ///
    /// With a destination the match is also printed there.
    pub async fn search(&self, query: &str, destination: Option<&str>) -> Result<Located> {
        let status = self.first_match(query).await?;

        let key = match destination {
            Some(destination) => self.announce(status.clone(), destination).await?,
            None => self.remember(status.clone()).await?,
        };
        Ok(Located { key, status })
    }

    // == Mute ==
    /// Mutes the conversation of a cached status or of the first match of a
    /// search.
    pub async fn mute(&self, target: &str) -> Result<MuteOutcome> {
        let candidate = ShortKey::from(target);
        let (key, status) = match self.lookup(&candidate).await {
            Ok(status) => (candidate, status),
            Err(_) => {
                let status = self.first_match(target).await?;
                (self.remember(status.clone()).await?, status)
            }
        };

        let result = self.client.mute(&status.id).await?;
        info!(%key, muted = result.muted, "Mute requested");
        Ok(MuteOutcome {
            key,
            muted: result.muted,
        })
    }

    // == Favourite ==
    /// Favourites the status under `key`, or unfavourites it if it already
    /// is. The refreshed status replaces the cached one unless the key left
    /// the cache while the remote call was in flight.
    pub async fn toggle_favourite(&self, key: &ShortKey) -> Result<FavouriteOutcome> {
        let status = self.lookup(key).await?;

        let updated = if status.favourited {
            self.client.unfavourite(&status.id).await?
        } else {
            self.client.favourite(&status.id).await?
        };

        let outcome = FavouriteOutcome {
            key: key.clone(),
            favourited: updated.favourited,
            url: updated.url.clone(),
        };
        let mut cache = self.cache.write().await;
        if cache.contains(key) {
            cache.put(key.clone(), updated);
        } else {
            debug!(%key, "Favourited status left the cache, not re-adding it");
        }
        Ok(outcome)
    }

    // == Cancel ==
    /// Cancels every deferred post. Returns how many were cancelled.
    pub fn cancel_pending(&self) -> usize {
        self.poster.cancel_all()
    }

    async fn first_match(&self, query: &str) -> Result<StatusRecord> {
        self.client
            .search(query.trim())
            .await?
            .statuses
            .into_iter()
            .next()
            .ok_or_else(|| BridgeError::RemoteNotFound(format!("no status matches {query}")))
    }
}
