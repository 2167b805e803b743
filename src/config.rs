//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    #[error("PRESIGN_BASE_URL is not a valid url: {0}")]
    InvalidBaseUrl(String),
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of responses the cache can hold
    pub cache_capacity: usize,
    /// Lifetime of a cached response in seconds
    pub cache_ttl: u64,
    /// Validity of a presigned photo link in seconds
    pub presign_lifetime: u64,
    /// Prefix prepended to every photo key
    pub presign_namespace: String,
    /// Base URL the photo links are issued under
    pub presign_base_url: String,
    /// Max presign calls in flight per enrichment pass, 0 for unbounded
    pub presign_concurrency: usize,
    /// Per-call presign deadline in seconds
    pub presign_timeout: u64,
    /// JSON document file backing the catalog store
    pub catalog_path: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` - Bind host (default: 0.0.0.0)
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `CACHE_CAPACITY` - Maximum cached responses (default: 1000)
    /// - `CACHE_TTL` - Cached response lifetime in seconds (default: 5400)
    /// - `PRESIGN_LIFETIME` - Photo link validity in seconds (default: 900)
    /// - `PRESIGN_NAMESPACE` - Photo key prefix (default: n8n_bikes)
    /// - `PRESIGN_BASE_URL` - Link base (default: http://localhost:9000/bikes)
    /// - `PRESIGN_CONCURRENCY` - In-flight presign limit (default: 32)
    /// - `PRESIGN_TIMEOUT` - Presign deadline in seconds (default: 10)
    /// - `CATALOG_PATH` - Catalog file (default: data/catalog.json)
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            server_port: parse_or(lookup("PORT"), defaults.server_port),
            cache_capacity: parse_or(lookup("CACHE_CAPACITY"), defaults.cache_capacity),
            cache_ttl: parse_or(lookup("CACHE_TTL"), defaults.cache_ttl),
            presign_lifetime: parse_or(lookup("PRESIGN_LIFETIME"), defaults.presign_lifetime),
            presign_namespace: lookup("PRESIGN_NAMESPACE").unwrap_or(defaults.presign_namespace),
            presign_base_url: lookup("PRESIGN_BASE_URL").unwrap_or(defaults.presign_base_url),
            presign_concurrency: parse_or(
                lookup("PRESIGN_CONCURRENCY"),
                defaults.presign_concurrency,
            ),
            presign_timeout: parse_or(lookup("PRESIGN_TIMEOUT"), defaults.presign_timeout),
            catalog_path: lookup("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::Zero("CACHE_CAPACITY"));
        }
        if self.cache_ttl == 0 {
            return Err(ConfigError::Zero("CACHE_TTL"));
        }
        if self.presign_lifetime == 0 {
            return Err(ConfigError::Zero("PRESIGN_LIFETIME"));
        }
        if self.presign_timeout == 0 {
            return Err(ConfigError::Zero("PRESIGN_TIMEOUT"));
        }
        Url::parse(&self.presign_base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.server_port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn presign_lifetime(&self) -> Duration {
        Duration::from_secs(self.presign_lifetime)
    }

    pub fn presign_timeout(&self) -> Duration {
        Duration::from_secs(self.presign_timeout)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            server_port: 8080,
            cache_capacity: 1000,
            cache_ttl: 90 * 60,
            presign_lifetime: 15 * 60,
            presign_namespace: "n8n_bikes".to_string(),
            presign_base_url: "http://localhost:9000/bikes".to_string(),
            presign_concurrency: 32,
            presign_timeout: 10,
            catalog_path: PathBuf::from("data/catalog.json"),
        }
    }
}
