//! Remote status model
//!
//! The subset of the microblogging payloads the bridge reads. Field names
//! follow the remote JSON so records deserialize straight from the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

// == Visibility ==
/// Scope of a remote post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Unlisted,
    Private,
    Direct,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
            Visibility::Direct => "direct",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            "direct" => Ok(Visibility::Direct),
            other => Err(BridgeError::InvalidInput(format!(
                "Unknown visibility: {other}"
            ))),
        }
    }
}

/// Author of a status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Handle, `user` for local accounts or `user@host` for remote ones
    pub acct: String,
}

/// Media attached to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub url: String,
}

// == Status Record ==
/// One remote post.
///
/// Treated as an immutable value: the cache swaps whole records and never
/// edits fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Remote identifier; empty when the payload carried none
    #[serde(default)]
    pub id: String,
    /// Canonical permalink, also the query used to find the status again
    #[serde(default)]
    pub url: String,
    pub account: Account,
    pub created_at: DateTime<Utc>,
    /// Body as HTML markup
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    #[serde(default)]
    pub favourited: bool,
    /// Body hidden behind a content warning
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl StatusRecord {
    /// Creates a plain record stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        acct: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            account: Account { acct: acct.into() },
            created_at: Utc::now(),
            content: content.into(),
            media_attachments: Vec::new(),
            favourited: false,
            sensitive: false,
            visibility: Visibility::default(),
        }
    }
}

// == Notifications ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Mention,
    Favourite,
    Reblog,
    Follow,
    #[serde(other)]
    Other,
}

/// A remote event concerning the bridge account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub status: Option<StatusRecord>,
}

impl Notification {
    pub fn mention(status: StatusRecord) -> Self {
        Self {
            kind: NotificationKind::Mention,
            status: Some(status),
        }
    }

    pub fn is_mention(&self) -> bool {
        self.kind == NotificationKind::Mention
    }
}

/// Result of a remote search; only statuses are of interest here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub statuses: Vec<StatusRecord>,
}

/// Result of muting a conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteResult {
    #[serde(default)]
    pub muted: bool,
}

// == New Status ==
/// An outgoing post, either top-level or a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatus {
    pub text: String,
    pub sensitive: bool,
    pub visibility: Visibility,
    /// Remote id of the status being replied to
    pub in_reply_to: Option<String>,
}
