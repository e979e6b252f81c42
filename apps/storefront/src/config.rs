//! Configuration for the storefront

use core_config::{env_millis, env_parse, ConfigError, FromEnv};
use domain_products::{CatalogConfig, FavouriteConfig};
use std::time::Duration;

pub use core_config::Environment;

/// Product List View settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub page_size: usize,
    /// Quiet period before a filter edit is considered
    pub debounce: Duration,
    /// Shortest non-empty filter that is applied
    pub min_filter_len: usize,
}

impl ViewConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self, ConfigError> {
        self.page_size = validate_page_size("page size", page_size)?;
        Ok(self)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            debounce: Duration::from_millis(500),
            min_filter_len: 3,
        }
    }
}

impl FromEnv for ViewConfig {
    /// Reads from environment variables with defaults:
    /// - STOREFRONT_PAGE_SIZE: 5
    /// - STOREFRONT_DEBOUNCE_MS: 500
    /// - STOREFRONT_MIN_FILTER_LEN: 3
    fn from_env() -> Result<Self, ConfigError> {
        let page_size = env_parse("STOREFRONT_PAGE_SIZE", 5)?;

        Ok(Self {
            page_size: validate_page_size("STOREFRONT_PAGE_SIZE", page_size)?,
            debounce: env_millis("STOREFRONT_DEBOUNCE_MS", 500)?,
            min_filter_len: env_parse("STOREFRONT_MIN_FILTER_LEN", 3)?,
        })
    }
}

fn validate_page_size(key: &str, page_size: usize) -> Result<usize, ConfigError> {
    if page_size == 0 {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            details: "page size must be at least 1".to_string(),
        });
    }
    Ok(page_size)
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub catalog: CatalogConfig,
    pub favourites: FavouriteConfig,
    pub view: ViewConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            catalog: CatalogConfig::from_env()?,
            favourites: FavouriteConfig::from_env()?,
            view: ViewConfig::from_env()?,
        })
    }
}
