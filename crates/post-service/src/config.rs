//! Post service configuration.
//!
//! Configuration is loaded from environment variables. The database URL and
//! the accepted API keys are redacted in Debug output.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:1234";

/// Default accepted API key.
pub const DEFAULT_API_KEY: &str = "ELITE";

/// Default CORS preflight cache duration (12 hours).
pub const DEFAULT_CORS_MAX_AGE_SECONDS: u64 = 12 * 60 * 60;

/// Default database pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// The fixed set of secrets accepted in the `SPITFIRE-API-KEY` header.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySet {
    keys: HashSet<String>,
}

impl ApiKeySet {
    /// Build a key set, dropping blank entries.
    ///
    /// Keys must be visible ASCII with optional inner spaces, the only header
    /// values the auth check reads as text.
    pub fn new<I, S>(keys: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = HashSet::new();

        for key in keys {
            let key = key.as_ref().trim();
            if key.is_empty() {
                continue;
            }

            if !key.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
                return Err(ConfigError::InvalidApiKeys(
                    "API keys must contain only visible ASCII characters".to_string(),
                ));
            }

            accepted.insert(key.to_string());
        }

        if accepted.is_empty() {
            return Err(ConfigError::InvalidApiKeys(
                "at least one non-empty API key is required".to_string(),
            ));
        }

        Ok(Self { keys: accepted })
    }

    /// Flat membership test.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for ApiKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeySet")
            .field("count", &self.keys.len())
            .finish()
    }
}

/// Post service configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:1234").
    pub bind_address: String,

    /// PostgreSQL connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,

    /// Maximum connections in the database pool.
    pub db_max_connections: u32,

    /// Accepted API keys.
    pub api_keys: ApiKeySet,

    /// CORS preflight cache duration in seconds.
    pub cors_max_age_seconds: u64,

    /// Seconds to keep draining connections after a shutdown signal.
    pub drain_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("api_keys", &self.api_keys)
            .field("cors_max_age_seconds", &self.cors_max_age_seconds)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API key configuration: {0}")]
    InvalidApiKeys(String),

    #[error("Invalid CORS max age configuration: {0}")]
    InvalidCorsMaxAge(String),

    #[error("Invalid database pool configuration: {0}")]
    InvalidDbMaxConnections(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let database_url = vars
            .get("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let api_keys = match vars.get("API_KEYS") {
            Some(raw) => ApiKeySet::new(raw.split(','))?,
            None => ApiKeySet::new([DEFAULT_API_KEY])?,
        };

        let cors_max_age_seconds = match vars.get("CORS_MAX_AGE_SECONDS") {
            Some(value_str) => value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidCorsMaxAge(format!(
                    "CORS_MAX_AGE_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => DEFAULT_CORS_MAX_AGE_SECONDS,
        };

        let db_max_connections = match vars.get("DB_MAX_CONNECTIONS") {
            Some(value_str) => {
                let value: u32 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidDbMaxConnections(format!(
                        "DB_MAX_CONNECTIONS must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidDbMaxConnections(
                        "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
                    ));
                }

                value
            }
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let drain_seconds = match vars.get("DRAIN_SECONDS") {
            Some(value_str) => value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => 0,
        };

        Ok(Config {
            bind_address,
            database_url,
            db_max_connections,
            api_keys,
            cors_max_age_seconds,
            drain_seconds,
        })
    }

    /// CORS preflight cache duration.
    pub fn cors_max_age(&self) -> Duration {
        Duration::from_secs(self.cors_max_age_seconds)
    }
}
