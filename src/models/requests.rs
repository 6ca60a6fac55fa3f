//! Request DTOs for the bridge API
//!
//! Commands as they arrive from chat or over HTTP.

use serde::Deserialize;

use super::status::Visibility;

/// A new toot or a reply to a cached one (POST /toots)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TootRequest {
    /// Body of the toot
    pub text: String,
    /// Chat nick appended as `~nick`
    #[serde(default)]
    pub nick: Option<String>,
    /// Post without the nick signature
    #[serde(default)]
    pub anonymous: bool,
    /// Short key of the status to reply to
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Overrides the configured visibility
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub sensitive: bool,
    /// Channel the confirmation goes to
    #[serde(default)]
    pub channel: Option<String>,
}

impl TootRequest {
    pub fn new(text: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            nick: Some(nick.into()),
            ..Self::default()
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            return Some("Nothing to toot".to_string());
        }
        if !self.anonymous && self.nick.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Some("A nick is required unless posting anonymously".to_string());
        }
        None
    }

    /// Body as sent, signed with the nick unless anonymous.
    pub fn body(&self) -> String {
        match (&self.nick, self.anonymous) {
            (Some(nick), false) => format!("{}\n~{}", self.text, nick.trim()),
            _ => self.text.clone(),
        }
    }
}

/// Remote search (POST /search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Permalink or free text
    pub query: String,
    /// Channel the match is printed to
    #[serde(default)]
    pub channel: Option<String>,
}

impl SearchRequest {
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Search query cannot be empty".to_string());
        }
        None
    }
}

/// Mute a conversation (POST /mute)
#[derive(Debug, Clone, Deserialize)]
pub struct MuteRequest {
    /// Short key or search query
    pub target: String,
}

impl MuteRequest {
    pub fn validate(&self) -> Option<String> {
        if self.target.trim().is_empty() {
            return Some("Nothing to mute".to_string());
        }
        None
    }
}
