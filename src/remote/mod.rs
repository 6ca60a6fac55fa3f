//! Remote Status Service Module
//!
//! The microblogging instance as seen by the bridge. The wire protocol lives
//! behind `StatusClient`; the bridge only depends on this capability.

mod loopback;

pub use loopback::{CallCounts, LoopbackClient};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{MuteResult, NewStatus, Notification, SearchResults, StatusRecord, Visibility};

// == Status Client ==
/// Operations the bridge needs from the remote service.
///
/// Any call may fail with `BridgeError::RemoteApi`; calls addressing a
/// status that no longer exists fail with `BridgeError::RemoteNotFound`.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn post(&self, text: &str, sensitive: bool, visibility: Visibility)
        -> Result<StatusRecord>;

    async fn reply(
        &self,
        parent_id: &str,
        text: &str,
        sensitive: bool,
        visibility: Visibility,
    ) -> Result<StatusRecord>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn search(&self, query: &str) -> Result<SearchResults>;

    async fn favourite(&self, id: &str) -> Result<StatusRecord>;

    async fn unfavourite(&self, id: &str) -> Result<StatusRecord>;

    async fn mute(&self, id: &str) -> Result<MuteResult>;

    /// Pending notifications, requested as mentions only. Callers still
    /// filter on the kind since instances don't all honour the filter.
    async fn mention_notifications(&self) -> Result<Vec<Notification>>;

    async fn clear_notifications(&self) -> Result<()>;

    /// Whether statuses outlive this process. Cached keys are only written
    /// to a durable store for backends that keep their statuses.
    fn is_durable(&self) -> bool {
        true
    }
}

/// Sends a `NewStatus` as a post or a reply, whichever it is.
pub async fn transmit(client: &dyn StatusClient, status: &NewStatus) -> Result<StatusRecord> {
    match &status.in_reply_to {
        Some(parent_id) => {
            client
                .reply(parent_id, &status.text, status.sensitive, status.visibility)
                .await
        }
        None => {
            client
                .post(&status.text, status.sensitive, status.visibility)
                .await
        }
    }
}
