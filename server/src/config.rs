//! Configuration management for the server.

use std::env;

/// Default SQLite database, created next to the binary if missing.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:listy.db?mode=rwc";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Shared bearer token; anonymous access when unset
    pub auth_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        let auth_secret = lookup("AUTH_SECRET")
            .map(|secret| secret.trim().to_string())
            .filter(|secret| !secret.is_empty());

        Ok(Self {
            host,
            port,
            database_url,
            auth_secret,
        })
    }

    /// In-memory database, no auth. Used by tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            auth_secret: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must not be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid PORT value")]
    InvalidPort,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert!(config.auth_secret.is_none());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("AUTH_SECRET", " s3cret "),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.auth_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn blank_secret_means_anonymous() {
        let config = load(&[("AUTH_SECRET", "   ")]).unwrap();
        assert!(config.auth_secret.is_none());
    }

    #[test]
    fn invalid_port() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::InvalidPort)));
        assert!(matches!(load(&[("PORT", "70000")]), Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn empty_database_url() {
        assert!(matches!(
            load(&[("DATABASE_URL", " ")]),
            Err(ConfigError::EmptyDatabaseUrl)
        ));
    }
}
