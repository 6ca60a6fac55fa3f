//! Configuration Module
//!
//! Handles loading and managing bridge configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Visibility;

/// Bridge configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of statuses the short-key cache holds
    pub cache_limit: usize,
    /// Chat destination that receives mention notifications, if any
    pub notification_channel: Option<String>,
    /// Notification polling interval in seconds
    pub poll_interval: u64,
    /// Delay before outgoing posts are transmitted, in seconds (0 = post immediately)
    pub post_delay: u64,
    /// Visibility used for posts that don't ask for one
    pub default_visibility: Visibility,
    /// HTTP server port
    pub server_port: u16,
    /// Location of the durable key-value store
    pub store_path: PathBuf,
    /// Namespace for all durable cache records
    pub namespace: String,
    /// Prefix put in front of every chat line
    pub output_prefix: String,
    /// Base URL of the microblogging instance
    pub instance_url: String,
    /// Account name the bridge posts as
    pub account_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_LIMIT` - Maximum cached statuses (default: 50)
    /// - `NOTIFICATION_CHANNEL` - Channel for mentions (default: unset, polling disabled)
    /// - `POLL_INTERVAL` - Notification polling frequency in seconds (default: 30)
    /// - `POST_DELAY` - Delay for outgoing posts in seconds (default: 0)
    /// - `DEFAULT_VISIBILITY` - public, unlisted, private or direct (default: unlisted)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_PATH` - JSON store file (default: troet-store.json)
    /// - `STORE_NAMESPACE` - Durable namespace (default: troet)
    /// - `OUTPUT_PREFIX` - Chat line prefix (default: "[troooet] ")
    /// - `INSTANCE_URL` - Instance base URL (default: https://social.example)
    /// - `ACCOUNT_NAME` - Account handle (default: troet)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_limit: parsed_var("CACHE_LIMIT").unwrap_or(defaults.cache_limit),
            notification_channel: env::var("NOTIFICATION_CHANNEL")
                .ok()
                .and_then(|v| normalize_channel(&v)),
            poll_interval: parsed_var("POLL_INTERVAL").unwrap_or(defaults.poll_interval),
            post_delay: parsed_var("POST_DELAY").unwrap_or(defaults.post_delay),
            default_visibility: parsed_var("DEFAULT_VISIBILITY")
                .unwrap_or(defaults.default_visibility),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            store_path: env::var("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            namespace: env::var("STORE_NAMESPACE").unwrap_or(defaults.namespace),
            output_prefix: env::var("OUTPUT_PREFIX").unwrap_or(defaults.output_prefix),
            instance_url: env::var("INSTANCE_URL").unwrap_or(defaults.instance_url),
            account_name: env::var("ACCOUNT_NAME").unwrap_or(defaults.account_name),
        }
    }

    /// Returns the post delay, or None when posts go out immediately.
    pub fn post_delay(&self) -> Option<Duration> {
        (self.post_delay > 0).then(|| Duration::from_secs(self.post_delay))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_limit: 50,
            notification_channel: None,
            poll_interval: 30,
            post_delay: 0,
            default_visibility: Visibility::Unlisted,
            server_port: 3000,
            store_path: PathBuf::from("troet-store.json"),
            namespace: "troet".to_string(),
            output_prefix: "[troooet] ".to_string(),
            instance_url: "https://social.example".to_string(),
            account_name: "troet".to_string(),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Config files tend to quote channel names; `"#chan"` and `#chan` mean the same.
fn normalize_channel(raw: &str) -> Option<String> {
    let channel = raw.trim().trim_matches('"');
    (!channel.is_empty()).then(|| channel.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_limit, 50);
        assert_eq!(config.poll_interval, 30);
        assert_eq!(config.post_delay, 0);
        assert_eq!(config.default_visibility, Visibility::Unlisted);
        assert!(config.notification_channel.is_none());
        assert!(config.post_delay().is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_LIMIT");
        env::remove_var("NOTIFICATION_CHANNEL");
        env::remove_var("POLL_INTERVAL");
        env::remove_var("POST_DELAY");

        let config = Config::from_env();
        assert_eq!(config.cache_limit, 50);
        assert_eq!(config.poll_interval, 30);
        assert!(config.notification_channel.is_none());
        assert!(config.post_delay().is_none());
    }

    #[test]
    fn test_post_delay_enabled() {
        let config = Config {
            post_delay: 5,
            ..Config::default()
        };
        assert_eq!(config.post_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_normalize_channel() {
        assert_eq!(normalize_channel("\"#hsmr\""), Some("#hsmr".to_string()));
        assert_eq!(normalize_channel(" #hsmr "), Some("#hsmr".to_string()));
        assert_eq!(normalize_channel("\"\""), None);
    }
}
