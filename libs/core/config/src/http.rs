use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::time::Duration;

/// Public catalog used when `CATALOG_API_URL` is not set.
pub const DEFAULT_CATALOG_URL: &str =
    "https://storerestservice12345.azurewebsites.net/api/products/";

/// Settings for the outbound HTTP client talking to the catalog resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Absolute URL of the collection, always ending in `/`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl FromEnv for HttpClientConfig {
    /// Reads from environment variables with defaults:
    /// - CATALOG_API_URL: defaults to the public catalog
    /// - CATALOG_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_URL);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "CATALOG_API_URL".to_string(),
                details: format!("'{}' is not an absolute http(s) URL", base_url),
            });
        }
        let timeout_secs: u64 = env_parse("CATALOG_TIMEOUT_SECS", 30)?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(timeout_secs),
            ..Self::default()
        })
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("storefront/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// Relative joins drop the last path segment unless the base ends with a slash.
fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
