//! Deferred Posting
//!
//! Holds composed statuses for a fixed delay before sending them, so an
//! issuer can still take them back. Every deferred post is its own spawned
//! task guarded by a cancellation token; `cancel_all` fires and forgets all
//! tokens that have not yet been claimed by their task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::ShortKey;
use crate::error::Result;
use crate::models::{NewStatus, StatusRecord};
use crate::remote::{transmit, StatusClient};
use crate::render::key_line;
use crate::session::SharedCache;
use crate::sink::MessageSink;

// == Post Outcome ==
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    /// Sent right away and cached under `key`.
    Posted { key: ShortKey, status: StatusRecord },
    /// Scheduled; sent after `delay` unless cancelled first.
    Deferred { ticket: u64, delay: Duration },
}

// == Deferred Poster ==
#[derive(Clone)]
pub struct DeferredPoster {
    delay: Option<Duration>,
    client: Arc<dyn StatusClient>,
    cache: SharedCache,
    sink: Arc<dyn MessageSink>,
    prefix: String,
    in_flight: Arc<Mutex<HashMap<u64, CancellationToken>>>,
    next_ticket: Arc<AtomicU64>,
}

impl DeferredPoster {
    /// Creates a poster. With `delay` set to `None` every submission is sent
    /// immediately.
    ///
    /// # Arguments
    /// * `delay` - How long submissions wait before being sent
    /// * `client` - Remote service the posts go to
    /// * `cache` - Cache that receives each sent status
    /// * `sink` - Where confirmations of deferred posts are printed
    /// * `prefix` - Prefix of every printed line
    pub fn new(
        delay: Option<Duration>,
        client: Arc<dyn StatusClient>,
        cache: SharedCache,
        sink: Arc<dyn MessageSink>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            delay,
            client,
            cache,
            sink,
            prefix: prefix.into(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Sends `post` now, or schedules it when a delay is configured.
    ///
    /// A deferred post prints its key line to `destination` once it has
    /// gone out, or a failure line if sending failed.
    pub async fn submit(&self, post: NewStatus, destination: Option<String>) -> Result<PostOutcome> {
        let Some(delay) = self.delay else {
            let (key, status) = publish(self.client.as_ref(), &self.cache, &post).await?;
            return Ok(PostOutcome::Posted { key, status });
        };

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.lock_in_flight().insert(ticket, token.clone());
        info!(ticket, delay_secs = delay.as_secs(), "Post deferred");

        let poster = self.clone();
        tokio::spawn(async move {
            poster.fire(ticket, token, delay, post, destination).await;
        });

        Ok(PostOutcome::Deferred { ticket, delay })
    }

    async fn fire(
        self,
        ticket: u64,
        token: CancellationToken,
        delay: Duration,
        post: NewStatus,
        destination: Option<String>,
    ) {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(delay) => {}
        }

        // A ticket still in the map has not been drained by cancel_all.
        let claimed = self.lock_in_flight().remove(&ticket).is_some() && !token.is_cancelled();
        if !claimed {
            debug!(ticket, "Deferred post cancelled");
            return;
        }

        match publish(self.client.as_ref(), &self.cache, &post).await {
            Ok((key, status)) => {
                info!(ticket, %key, "Deferred post sent");
                if let Some(destination) = destination {
                    self.sink
                        .send(&key_line(&key, &status.url, &self.prefix), &destination);
                }
            }
            Err(e) => {
                warn!(ticket, error = %e, "Deferred post failed");
                if let Some(destination) = destination {
                    self.sink
                        .send(&format!("{}Posting failed: {e}", self.prefix), &destination);
                }
            }
        }
    }

    /// Cancels every post that has not started sending. Returns how many
    /// were cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut in_flight = self.lock_in_flight();
        let count = in_flight.len();
        for (_, token) in in_flight.drain() {
            token.cancel();
        }

        if count > 0 {
            info!(count, "Cancelled deferred posts");
        }
        count
    }

    /// Number of posts still waiting.
    pub fn pending(&self) -> usize {
        self.lock_in_flight().len()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<u64, CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Sends `post` and caches the resulting status.
pub async fn publish(
    client: &dyn StatusClient,
    cache: &SharedCache,
    post: &NewStatus,
) -> Result<(ShortKey, StatusRecord)> {
    let status = transmit(client, post).await?;
    let key = cache.write().await.insert_status(status.clone())?;
    Ok((key, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StatusCache;
    use crate::models::Visibility;
    use crate::persist::MemoryStore;
    use crate::remote::LoopbackClient;
    use crate::sink::MemorySink;
    use tokio::sync::RwLock;

    struct Fixture {
        client: Arc<LoopbackClient>,
        cache: SharedCache,
        sink: Arc<MemorySink>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            client: Arc::new(LoopbackClient::new("https://social.example", "troet")),
            cache: Arc::new(RwLock::new(StatusCache::new(10, store, "troet"))),
            sink: Arc::new(MemorySink::new()),
        }
    }

    fn poster(f: &Fixture, delay: Option<u64>) -> DeferredPoster {
        DeferredPoster::new(
            delay.map(Duration::from_secs),
            f.client.clone(),
            f.cache.clone(),
            f.sink.clone(),
            "[t] ",
        )
    }

    fn post(text: &str) -> NewStatus {
        NewStatus {
            text: text.to_string(),
            sensitive: false,
            visibility: Visibility::Unlisted,
            in_reply_to: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_post() {
        let f = fixture();
        let poster = poster(&f, None);

        let outcome = poster.submit(post("hi"), Some("#chan".into())).await.unwrap();

        let PostOutcome::Posted { key, status } = outcome else {
            panic!("expected an immediate post");
        };
        assert_eq!(f.cache.read().await.get(&key).unwrap(), &status);
        assert_eq!(f.client.calls().posts, 1);
        // Immediate posts are confirmed by the caller, not the poster
        assert!(f.sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_post_fires_after_delay() {
        let f = fixture();
        let poster = poster(&f, Some(5));

        let outcome = poster.submit(post("later"), Some("#chan".into())).await.unwrap();
        assert!(matches!(outcome, PostOutcome::Deferred { ticket: 1, .. }));
        assert_eq!(poster.pending(), 1);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(f.client.calls().posts, 0);
        assert!(f.cache.read().await.is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(f.client.calls().posts, 1);
        assert_eq!(f.cache.read().await.len(), 1);
        assert_eq!(poster.pending(), 0);

        let lines = f.sink.lines_to("#chan");
        assert_eq!(lines.len(), 1);
        let key = f.cache.read().await.keys()[0].clone();
        assert!(lines[0].starts_with(&format!("[t] [{key}] https://social.example/@troet/")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_delay() {
        let f = fixture();
        let poster = poster(&f, Some(5));

        poster.submit(post("one"), Some("#chan".into())).await.unwrap();
        poster.submit(post("two"), None).await.unwrap();
        assert_eq!(poster.cancel_all(), 2);
        assert_eq!(poster.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(f.client.calls().posts, 0);
        assert!(f.cache.read().await.is_empty());
        assert!(f.sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_midway_then_submit_again() {
        let f = fixture();
        let poster = poster(&f, Some(5));

        poster.submit(post("dropped"), None).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(poster.cancel_all(), 1);

        poster.submit(post("kept"), None).await.unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(f.client.calls().posts, 1);
        let statuses = f.client.statuses();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].content.contains("kept"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_with_nothing_pending() {
        let f = fixture();
        let poster = poster(&f, Some(5));
        assert_eq!(poster.cancel_all(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_failure_is_reported() {
        let f = fixture();
        let poster = poster(&f, Some(1));
        let mut reply = post("orphan");
        reply.in_reply_to = Some("404".to_string());

        poster.submit(reply, Some("#chan".into())).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let lines = f.sink.lines_to("#chan");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[t] Posting failed: "));
        assert!(f.cache.read().await.is_empty());
    }
}
