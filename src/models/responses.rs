//! Response DTOs for the bridge API
//!
//! Defines the structure of outgoing HTTP response bodies. Every body that
//! answers a command carries `message`, the line a chat issuer would see.
//! Bodies naming a cached status also carry `href`, its route with the key
//! percent-encoded; keys may contain `/`, so clients should follow `href`
//! rather than splice `key` into a path.

use serde::Serialize;

use crate::actions::{FavouriteOutcome, Located, MuteOutcome};
use crate::cache::{CacheEntry, CacheStats, ShortKey};
use crate::render::strip_tags;
use crate::tasks::PostOutcome;

/// Route of the status cached under `key`.
pub fn toot_href(key: &ShortKey) -> String {
    format!("/toots/{}", key.path_segment())
}

/// A cached status (GET /toots/:key, and items of GET /toots)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub key: String,
    pub href: String,
    pub id: String,
    pub url: String,
    pub author: String,
    /// Body with markup stripped
    pub text: String,
    pub favourited: bool,
    /// Seconds since the status entered the cache
    pub cached_for_secs: i64,
}

impl StatusResponse {
    pub fn new(key: &ShortKey, entry: &CacheEntry) -> Self {
        let status = &entry.status;
        Self {
            key: key.to_string(),
            href: toot_href(key),
            id: status.id.clone(),
            url: status.url.clone(),
            author: status.account.acct.clone(),
            text: strip_tags(&status.content),
            favourited: status.favourited,
            cached_for_secs: entry.age_secs(),
        }
    }
}

/// Cached statuses, oldest first (GET /toots)
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub capacity: usize,
    pub toots: Vec<StatusResponse>,
}

/// Response body for POST /toots
#[derive(Debug, Clone, Serialize)]
pub struct TootResponse {
    pub message: String,
    /// Present once the status is posted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Present while the post is deferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<u64>,
}

impl TootResponse {
    pub fn new(outcome: &PostOutcome, prefix: &str) -> Self {
        match outcome {
            PostOutcome::Posted { key, status } => Self {
                message: format!("{prefix}[{key}] {}", status.url),
                key: Some(key.to_string()),
                href: Some(toot_href(key)),
                url: Some(status.url.clone()),
                ticket: None,
            },
            PostOutcome::Deferred { ticket, delay } => Self {
                message: format!(
                    "{prefix}Posting in {} seconds. Cancel with POST /cancel.",
                    delay.as_secs()
                ),
                key: None,
                href: None,
                url: None,
                ticket: Some(*ticket),
            },
        }
    }
}

/// Response body for DELETE /toots/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: &ShortKey, prefix: &str) -> Self {
        Self {
            message: format!("{prefix}Deleted: [{key}]"),
            key: key.to_string(),
        }
    }
}

/// Response body for POST /toots/:key/favourite
#[derive(Debug, Clone, Serialize)]
pub struct FavouriteResponse {
    pub message: String,
    pub key: String,
    pub href: String,
    pub favourited: bool,
}

impl FavouriteResponse {
    pub fn new(outcome: &FavouriteOutcome, prefix: &str) -> Self {
        let verb = if outcome.favourited {
            "Favourited"
        } else {
            "Unfavourited"
        };
        Self {
            message: format!("{prefix}{verb}: [{}] {}", outcome.key, outcome.url),
            key: outcome.key.to_string(),
            href: toot_href(&outcome.key),
            favourited: outcome.favourited,
        }
    }
}

/// Response body for POST /search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub message: String,
    pub key: String,
    pub href: String,
    pub url: String,
}

impl SearchResponse {
    pub fn new(located: &Located, prefix: &str) -> Self {
        Self {
            message: format!("{prefix}[{}] {}", located.key, located.status.url),
            key: located.key.to_string(),
            href: toot_href(&located.key),
            url: located.status.url.clone(),
        }
    }
}

/// Response body for POST /mute
#[derive(Debug, Clone, Serialize)]
pub struct MuteResponse {
    pub message: String,
    pub key: String,
    pub href: String,
    pub muted: bool,
}

impl MuteResponse {
    pub fn new(outcome: &MuteOutcome, prefix: &str) -> Self {
        let message = if outcome.muted {
            format!("{prefix}[{}] Muted.", outcome.key)
        } else {
            format!("{prefix}[{}] Not muted.", outcome.key)
        };
        Self {
            message,
            key: outcome.key.to_string(),
            href: toot_href(&outcome.key),
            muted: outcome.muted,
        }
    }
}

/// Response body for POST /cancel
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub cancelled: usize,
}

impl CancelResponse {
    pub fn new(cancelled: usize, prefix: &str) -> Self {
        let message = match cancelled {
            0 => format!("{prefix}Nothing to cancel."),
            n => format!("{prefix}Cancelled {n} pending post(s)."),
        };
        Self { message, cancelled }
    }
}

/// Response body for POST /notifications/poll
#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub announced: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub capacity: usize,
    pub pending_posts: usize,
    /// Fraction of the capacity in use
    pub fill_ratio: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, capacity: usize, pending_posts: usize) -> Self {
        let fill_ratio = if capacity > 0 {
            stats.total_entries as f64 / capacity as f64
        } else {
            0.0
        };
        Self {
            stats,
            capacity,
            pending_posts,
            fill_ratio,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusRecord;
    use std::time::Duration;

    fn status() -> StatusRecord {
        StatusRecord::new("7", "https://social.example/@troet/7", "troet", "<p>hi &amp; bye</p>")
    }

    #[test]
    fn test_status_response_strips_markup() {
        let entry = CacheEntry::new(status());
        let resp = StatusResponse::new(&ShortKey::from("AbCd"), &entry);
        assert_eq!(resp.key, "AbCd");
        assert_eq!(resp.text, "hi & bye");
        assert_eq!(resp.author, "troet");
    }

    #[test]
    fn test_toot_response_posted() {
        let outcome = PostOutcome::Posted {
            key: ShortKey::from("AbCd"),
            status: status(),
        };
        let resp = TootResponse::new(&outcome, "[t] ");
        assert_eq!(resp.message, "[t] [AbCd] https://social.example/@troet/7");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"key\":\"AbCd\""));
        assert!(!json.contains("ticket"));
    }

    #[test]
    fn test_href_escapes_slash_keys() {
        let key = ShortKey::from("/Wla");
        let resp = StatusResponse::new(&key, &CacheEntry::new(status()));
        assert_eq!(resp.key, "/Wla");
        assert_eq!(resp.href, "/toots/%2FWla");
    }

    #[test]
    fn test_toot_response_deferred() {
        let outcome = PostOutcome::Deferred {
            ticket: 3,
            delay: Duration::from_secs(30),
        };
        let resp = TootResponse::new(&outcome, "");
        assert!(resp.message.starts_with("Posting in 30 seconds"));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"ticket\":3"));
        assert!(!json.contains("\"key\""));
        assert!(!json.contains("href"));
    }

    #[test]
    fn test_favourite_and_mute_messages() {
        let fav = FavouriteResponse::new(
            &FavouriteOutcome {
                key: ShortKey::from("AbCd"),
                favourited: false,
                url: "u".to_string(),
            },
            "",
        );
        assert_eq!(fav.message, "Unfavourited: [AbCd] u");

        let mute = MuteResponse::new(
            &MuteOutcome {
                key: ShortKey::from("AbCd"),
                muted: true,
            },
            "[t] ",
        );
        assert_eq!(mute.message, "[t] [AbCd] Muted.");
    }

    #[test]
    fn test_cancel_response() {
        assert_eq!(CancelResponse::new(0, "").message, "Nothing to cancel.");
        assert_eq!(CancelResponse::new(2, "").cancelled, 2);
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let stats = CacheStats {
            inserts: 4,
            total_entries: 5,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(stats, 10, 1);
        assert!((resp.fill_ratio - 0.5).abs() < 0.001);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"inserts\":4"));
        assert!(json.contains("\"pending_posts\":1"));
    }

    #[test]
    fn test_stats_response_zero_capacity() {
        let resp = StatsResponse::new(CacheStats::default(), 0, 0);
        assert_eq!(resp.fill_ratio, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
