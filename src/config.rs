//! Configuration Module
//!
//! Loads node configuration from environment variables.

use std::env;

use crate::cache::NO_EXPIRY;
use crate::error::{CacheError, Result};

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds applied when a request carries none (-1 = never expires)
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between crawler cycles
    pub crawl_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Cache capacity (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, -1 for none (default: -1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CRAWL_INTERVAL` - Crawler frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            crawl_interval: parse_var("CRAWL_INTERVAL").unwrap_or(defaults.crawl_interval),
        }
    }

    /// Rejects settings the cache engine or the crawler cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "MAX_ENTRIES must be at least 1".to_string(),
            ));
        }
        if self.crawl_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "CRAWL_INTERVAL must be at least 1 second".to_string(),
            ));
        }
        if self.default_ttl < NO_EXPIRY {
            return Err(CacheError::InvalidConfig(format!(
                "DEFAULT_TTL must be -1 or non-negative, got {}",
                self.default_ttl
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: NO_EXPIRY,
            server_port: 3000,
            crawl_interval: 1,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
