//! Client configuration.

use std::env;
use std::time::Duration;

use listy_engine::CITIES_COLLECTION;

/// Where the host finds its remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the document server
    pub server_url: String,
    /// Collection holding the cities
    pub collection: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Wait before reopening a dropped listener
    pub reconnect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:3000".to_string(),
            collection: CITIES_COLLECTION.to_string(),
            auth_token: None,
            reconnect_delay: Duration::from_millis(1000),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `server_url` with everything else defaulted.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `LISTY_SERVER_URL`, `LISTY_COLLECTION`, `LISTY_AUTH_TOKEN` and
    /// `LISTY_RECONNECT_DELAY_MS` override the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_url = lookup("LISTY_SERVER_URL").unwrap_or(defaults.server_url);

        let collection = lookup("LISTY_COLLECTION").unwrap_or(defaults.collection);
        if collection.trim().is_empty() {
            return Err(ConfigError::EmptyCollection);
        }

        let auth_token = lookup("LISTY_AUTH_TOKEN").filter(|token| !token.trim().is_empty());

        let reconnect_delay = match lookup("LISTY_RECONNECT_DELAY_MS") {
            Some(value) => value
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidReconnectDelay(value))?,
            None => defaults.reconnect_delay,
        };

        Ok(Self {
            server_url,
            collection,
            auth_token,
            reconnect_delay,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LISTY_COLLECTION must not be empty")]
    EmptyCollection,

    #[error("Invalid LISTY_RECONNECT_DELAY_MS value: {0}")]
    InvalidReconnectDelay(String),
}
