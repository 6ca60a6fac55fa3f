//! troet_bridge - bridges a chat channel to a microblogging account
//!
//! Posts, replies, deletes, favourites and mutes statuses on behalf of chat
//! users, and mirrors mentions of the account into a channel. Statuses are
//! addressed in chat by four-character short keys backed by a bounded,
//! persisted cache.

pub mod actions;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod remote;
pub mod render;
pub mod session;
pub mod sink;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{ShortKey, StatusCache};
pub use config::Config;
pub use error::{BridgeError, Result};
pub use session::{Session, SharedCache};
pub use tasks::{spawn_notification_task, DeferredPoster, NotificationPoller, PostOutcome};
