//! Notification Polling Task
//!
//! Periodically fetches mentions of the bridge account, prints each one to
//! the notification channel and caches it so chat users can act on it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::Session;

// == Notification Poller ==
#[derive(Clone)]
pub struct NotificationPoller {
    session: Session,
    channel: Option<String>,
}

impl NotificationPoller {
    pub fn new(session: Session, channel: Option<String>) -> Self {
        Self { session, channel }
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Runs one poll. Returns the number of mentions announced.
    ///
    /// Does nothing without a notification channel. Entries that are not
    /// mentions, or that carry no usable status, are skipped. Notifications
    /// are cleared remotely only when the fetch returned something.
    pub async fn tick(&self) -> Result<usize> {
        let Some(channel) = self.channel.as_deref() else {
            return Ok(0);
        };

        let notifications = self.session.client.mention_notifications().await?;
        let mut announced = 0;

        for notification in notifications.iter().filter(|n| n.is_mention()) {
            let Some(status) = notification.status.clone() else {
                warn!("Mention without a status, skipping");
                continue;
            };

            match self.session.announce(status, channel).await {
                Ok(key) => {
                    debug!(%key, "Mention announced");
                    announced += 1;
                }
                Err(e) => warn!(error = %e, "Skipping malformed mention"),
            }
        }

        if !notifications.is_empty() {
            self.session.client.clear_notifications().await?;
        }

        Ok(announced)
    }
}

/// Spawns a background task that polls for mentions.
///
/// The task sleeps for the interval before every poll. A failed poll is
/// logged and retried on the next interval.
///
/// # Arguments
/// * `poller` - Poller bound to the session and notification channel
/// * `poll_interval_secs` - Interval in seconds between polls
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_notification_task(poller: NotificationPoller, poll_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(poll_interval_secs);

    tokio::spawn(async move {
        info!(
            channel = poller.channel().unwrap_or("-"),
            "Starting notification poller with interval of {} seconds", poll_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match poller.tick().await {
                Ok(0) => debug!("Notification poll: no new mentions"),
                Ok(count) => info!("Notification poll: announced {} mentions", count),
                Err(e) => warn!(error = %e, "Notification poll failed"),
            }
        }
    })
}
