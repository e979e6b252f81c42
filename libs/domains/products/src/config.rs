use core_config::http::HttpClientConfig;
use core_config::{env_millis, env_parse, ConfigError, FromEnv};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Settings for the product Data Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub http: HttpClientConfig,
    /// Applied to the list fetch only
    pub retry: RetryPolicy,
    /// Pause before a successful list is handed out (presentation pacing)
    pub emit_delay: Duration,
}

impl CatalogConfig {
    /// No retries and no pacing: fail fast, used by tests and scripted runs.
    pub fn immediate(http: HttpClientConfig) -> Self {
        Self {
            http,
            retry: RetryPolicy::none(),
            emit_delay: Duration::ZERO,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            http: HttpClientConfig::default(),
            retry: RetryPolicy::default(),
            emit_delay: Duration::from_millis(1500),
        }
    }
}

impl FromEnv for CatalogConfig {
    /// Reads:
    /// - CATALOG_RETRY_COUNT (default 3)
    /// - CATALOG_RETRY_DELAY_MS (default 1000)
    /// - CATALOG_EMIT_DELAY_MS (default 1500)
    /// plus the HTTP client variables of [`HttpClientConfig`]
    fn from_env() -> Result<Self, ConfigError> {
        let retry = RetryPolicy::new()
            .with_max_retries(env_parse("CATALOG_RETRY_COUNT", 3)?)
            .with_delay(env_millis("CATALOG_RETRY_DELAY_MS", 1000)?);

        Ok(Self {
            http: HttpClientConfig::from_env()?,
            retry,
            emit_delay: env_millis("CATALOG_EMIT_DELAY_MS", 1500)?,
        })
    }
}

/// Settings for the Favourites Service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavouriteConfig {
    /// How long a "favourite added" notification stays visible
    pub notification_ttl: Duration,
}

impl Default for FavouriteConfig {
    fn default() -> Self {
        Self {
            notification_ttl: Duration::from_millis(3000),
        }
    }
}

impl FromEnv for FavouriteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            notification_ttl: env_millis("FAVOURITE_NOTIFICATION_MS", 3000)?,
        })
    }
}
