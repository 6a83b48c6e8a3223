//! Client configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CLASSBOOK_API_URL` | `base_url` |
//! | `CLASSBOOK_DATA_DIR` | `data_dir` |
//! | `CLASSBOOK_TIMEOUT_SECS` | `request_timeout` |

use chrono::Duration;
use std::path::PathBuf;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Cache lifetime for news responses.
pub const NEWS_TTL_MINUTES: i64 = 10;

/// Cache lifetime for schedule responses.
pub const SCHEDULE_TTL_MINUTES: i64 = 30;

/// Configuration for the API client, cache, and local storage.
///
/// # Example
///
/// ```ignore
/// use classbook::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://school.example.org/api")
///     .with_request_timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without trailing slash
    pub base_url: String,
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,
    /// Transport timeout per request
    pub request_timeout: std::time::Duration,
    /// Cache lifetime for news
    pub news_ttl: Duration,
    /// Cache lifetime for schedules
    pub schedule_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            request_timeout: std::time::Duration::from_secs(30),
            news_ttl: Duration::minutes(NEWS_TTL_MINUTES),
            schedule_ttl: Duration::minutes(SCHEDULE_TTL_MINUTES),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CLASSBOOK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("CLASSBOOK_API_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(&url);
        }
        if let Some(dir) = lookup("CLASSBOOK_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        match lookup("CLASSBOOK_TIMEOUT_SECS").map(|v| v.trim().parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => {
                config.request_timeout = std::time::Duration::from_secs(secs);
            }
            Some(_) => {
                tracing::warn!("Ignoring invalid CLASSBOOK_TIMEOUT_SECS");
            }
            None => {}
        }
        config
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the news cache lifetime.
    pub fn with_news_ttl(mut self, ttl: Duration) -> Self {
        self.news_ttl = ttl;
        self
    }

    /// Set the schedule cache lifetime.
    pub fn with_schedule_ttl(mut self, ttl: Duration) -> Self {
        self.schedule_ttl = ttl;
        self
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("classbook"))
        .unwrap_or_else(|| PathBuf::from(".classbook"))
}
