//! Loopback status service
//!
//! An in-process stand-in for a microblogging instance. The binary falls back
//! to it when no remote backend is wired in, and tests use it to observe
//! exactly which remote calls were made.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::models::{MuteResult, Notification, SearchResults, StatusRecord, Visibility};
use crate::remote::StatusClient;

const FIRST_ID: u64 = 110_000_000_000_000_000;

/// Number of calls made per remote operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub posts: usize,
    pub replies: usize,
    pub deletes: usize,
    pub searches: usize,
    pub favourites: usize,
    pub unfavourites: usize,
    pub mutes: usize,
    pub notification_fetches: usize,
    pub clears: usize,
}

#[derive(Debug, Default)]
struct LoopbackState {
    statuses: Vec<StatusRecord>,
    muted: HashSet<String>,
    notifications: Vec<Notification>,
    issued: u64,
    calls: CallCounts,
    failing_queries: HashSet<String>,
    fail_notifications: bool,
}

// == Loopback Client ==
/// In-memory status service implementing `StatusClient`.
#[derive(Debug)]
pub struct LoopbackClient {
    instance_url: String,
    account: String,
    state: Mutex<LoopbackState>,
}

impl LoopbackClient {
    pub fn new(instance_url: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            account: account.into(),
            state: Mutex::new(LoopbackState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Creates a status authored by `acct` on the service and returns it.
    pub fn compose(&self, acct: &str, text: &str) -> StatusRecord {
        let mut state = self.state();
        self.create(&mut state, acct, text, false, Visibility::Public)
    }

    /// Queues a mention of the bridge account for `status`.
    pub fn push_mention(&self, status: StatusRecord) {
        self.state().notifications.push(Notification::mention(status));
    }

    /// Queues an arbitrary notification.
    pub fn push_notification(&self, notification: Notification) {
        self.state().notifications.push(notification);
    }

    /// Makes searches for exactly `query` fail with a remote API error.
    pub fn fail_search_for(&self, query: &str) {
        self.state().failing_queries.insert(query.to_string());
    }

    /// Makes notification fetches fail until switched back.
    pub fn fail_notifications(&self, fail: bool) {
        self.state().fail_notifications = fail;
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls.clone()
    }

    pub fn statuses(&self) -> Vec<StatusRecord> {
        self.state().statuses.clone()
    }

    pub fn pending_notifications(&self) -> usize {
        self.state().notifications.len()
    }

    pub fn is_muted(&self, id: &str) -> bool {
        self.state().muted.contains(id)
    }

    fn create(
        &self,
        state: &mut LoopbackState,
        acct: &str,
        text: &str,
        sensitive: bool,
        visibility: Visibility,
    ) -> StatusRecord {
        let id = (FIRST_ID + state.issued).to_string();
        state.issued += 1;

        let url = format!("{}/@{}/{}", self.instance_url, acct, id);
        let mut status = StatusRecord::new(id, url, acct, to_markup(text));
        status.visibility = visibility;
        status.sensitive = sensitive;
        debug!(id = %status.id, acct, "loopback status created");

        state.statuses.push(status.clone());
        status
    }

    fn set_favourited(&self, id: &str, favourited: bool) -> Result<StatusRecord> {
        let mut state = self.state();
        let status = state
            .statuses
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| BridgeError::RemoteNotFound(format!("status {id}")))?;
        status.favourited = favourited;
        Ok(status.clone())
    }
}

#[async_trait]
impl StatusClient for LoopbackClient {
    async fn post(
        &self,
        text: &str,
        sensitive: bool,
        visibility: Visibility,
    ) -> Result<StatusRecord> {
        let mut state = self.state();
        state.calls.posts += 1;
        Ok(self.create(&mut state, &self.account, text, sensitive, visibility))
    }

    async fn reply(
        &self,
        parent_id: &str,
        text: &str,
        sensitive: bool,
        visibility: Visibility,
    ) -> Result<StatusRecord> {
        let mut state = self.state();
        state.calls.replies += 1;
        let parent = state
            .statuses
            .iter()
            .find(|s| s.id == parent_id)
            .ok_or_else(|| BridgeError::RemoteNotFound(format!("status {parent_id}")))?;

        // Replies address the parent's author, as real instances do.
        let text = if parent.account.acct == self.account {
            text.to_string()
        } else {
            format!("@{} {}", parent.account.acct, text)
        };
        Ok(self.create(&mut state, &self.account, &text, sensitive, visibility))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.deletes += 1;
        let before = state.statuses.len();
        state.statuses.retain(|s| s.id != id);
        if state.statuses.len() == before {
            return Err(BridgeError::RemoteNotFound(format!("status {id}")));
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<SearchResults> {
        let mut state = self.state();
        state.calls.searches += 1;
        if state.failing_queries.contains(query) {
            return Err(BridgeError::RemoteApi(format!("search failed for {query}")));
        }

        let query = query.trim();
        let statuses = state
            .statuses
            .iter()
            .filter(|s| !query.is_empty() && (s.url == query || s.content.contains(query)))
            .cloned()
            .collect();
        Ok(SearchResults { statuses })
    }

    async fn favourite(&self, id: &str) -> Result<StatusRecord> {
        self.state().calls.favourites += 1;
        self.set_favourited(id, true)
    }

    async fn unfavourite(&self, id: &str) -> Result<StatusRecord> {
        self.state().calls.unfavourites += 1;
        self.set_favourited(id, false)
    }

    async fn mute(&self, id: &str) -> Result<MuteResult> {
        let mut state = self.state();
        state.calls.mutes += 1;
        if !state.statuses.iter().any(|s| s.id == id) {
            return Err(BridgeError::RemoteNotFound(format!("status {id}")));
        }
        state.muted.insert(id.to_string());
        Ok(MuteResult { muted: true })
    }

    async fn mention_notifications(&self) -> Result<Vec<Notification>> {
        let mut state = self.state();
        state.calls.notification_fetches += 1;
        if state.fail_notifications {
            return Err(BridgeError::RemoteApi(
                "notifications unavailable".to_string(),
            ));
        }
        Ok(state.notifications.clone())
    }

    async fn clear_notifications(&self) -> Result<()> {
        let mut state = self.state();
        state.calls.clears += 1;
        state.notifications.clear();
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}

/// Plain text to the paragraph markup instances hand back.
fn to_markup(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>");
    format!("<p>{escaped}</p>")
}
