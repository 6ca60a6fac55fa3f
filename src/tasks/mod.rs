//! Background Tasks Module
//!
//! Work that runs outside of command handling.
//!
//! # Tasks
//! - Notification polling: mirrors mentions into the notification channel
//! - Deferred posting: sends composed statuses after a cancellable delay

mod deferred;
mod notifications;

pub use deferred::{publish, DeferredPoster, PostOutcome};
pub use notifications::{spawn_notification_task, NotificationPoller};
