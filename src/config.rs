//! Environment-driven configuration for the client and the media proxy.

use std::time::Duration;

/// Environment variable naming the remote API origin.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
/// Environment variable bounding each transport request, in seconds.
pub const API_TIMEOUT_SECS_ENV: &str = "API_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STORAGE_PREFIX: &str = "/storage/";
pub const DEFAULT_MEDIA_MAX_AGE: Duration = Duration::from_secs(3600);

/// Settings for [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base(api_base_url.into()),
            ..Self::default()
        }
    }

    /// Read `API_BASE_URL` and `API_TIMEOUT_SECS`, falling back to defaults
    /// for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup(API_BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(normalize_base)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let timeout = lookup(API_TIMEOUT_SECS_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Self {
            api_base_url,
            timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join `path` onto the base URL with exactly one `/` between them.
    /// Absolute `http(s)://` paths are returned unchanged.
    pub fn resolve(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

/// Settings for the media proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Origin the proxied paths are appended to.
    pub remote_base: String,
    /// Only `path` values starting with this prefix are relayed.
    pub path_prefix: String,
    /// `max-age` advertised on relayed responses.
    pub max_age: Duration,
    pub upstream_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            remote_base: DEFAULT_API_BASE_URL.to_string(),
            path_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            max_age: DEFAULT_MEDIA_MAX_AGE,
            upstream_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProxyConfig {
    pub fn new(remote_base: impl Into<String>) -> Self {
        Self {
            remote_base: normalize_base(remote_base.into()),
            ..Self::default()
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn upstream_url(&self, path: &str) -> String {
        join_url(&self.remote_base, path)
    }
}

fn normalize_base(base: String) -> String {
    base.trim().trim_end_matches('/').to_string()
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
