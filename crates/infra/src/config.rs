//! Configuration loaded from environment variables.

use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where organizations and partnerships are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local maps; data is lost on restart. Used by tests and dev.
    InMemory,
    Postgres {
        url: String,
        max_connections: u32,
    },
}

/// Infrastructure configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraConfig {
    pub storage: StorageBackend,
}

impl InfraConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                |
    /// |----------------------------|------------------------|
    /// | `DATABASE_URL`             | unset → in-memory      |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            None => StorageBackend::InMemory,
            Some(url) => {
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    None => DEFAULT_MAX_CONNECTIONS,
                    Some(raw) => parse_max_connections(&raw)?,
                };
                StorageBackend::Postgres {
                    url,
                    max_connections,
                }
            }
        };

        Ok(Self { storage })
    }
}

fn parse_max_connections(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::Invalid {
            key: "DATABASE_MAX_CONNECTIONS",
            expected: "a positive integer",
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn no_database_url_means_in_memory() {
        let config = InfraConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.storage, StorageBackend::InMemory);
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let config = InfraConfig::from_vars(vars(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.storage, StorageBackend::InMemory);
    }

    #[test]
    fn database_url_selects_postgres_with_default_pool() {
        let config =
            InfraConfig::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/care")])).unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                url: "postgres://localhost/care".to_string(),
                max_connections: 5,
            }
        );
    }

    #[test]
    fn invalid_pool_size_is_rejected() {
        let err = InfraConfig::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/care"),
            ("DATABASE_MAX_CONNECTIONS", "zero"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
