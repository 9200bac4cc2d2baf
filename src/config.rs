//! Store connection settings.
//!
//! The engine itself only consumes the [`GraphStore`](crate::graph::GraphStore)
//! capability; these settings exist for callers wiring a networked graph
//! database behind it. The source of truth is the environment, read once at
//! startup and passed down explicitly rather than consulted ambiently.

use std::env;

/// Environment variable naming the graph database URL.
pub const DB_URL_VAR: &str = "QUEST_DB_URL";
/// Environment variable naming the database username.
pub const DB_USERNAME_VAR: &str = "QUEST_DB_USERNAME";
/// Environment variable naming the database password.
pub const DB_PASSWORD_VAR: &str = "QUEST_DB_PASSWORD";

const DEFAULT_URL: &str = "http://localhost:7474";

/// Connection settings for a graph database backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database URL.
    pub url: String,
    /// Username, if the database requires authentication.
    pub username: Option<String>,
    /// Password, if the database requires authentication.
    pub password: Option<String>,
}

impl StoreConfig {
    /// Read settings from the environment, falling back to a local default
    /// URL and no credentials.
    pub fn from_env() -> Self {
        Self {
            url: env::var(DB_URL_VAR).unwrap_or_else(|_| DEFAULT_URL.to_string()),
            username: env::var(DB_USERNAME_VAR).ok(),
            password: env::var(DB_PASSWORD_VAR).ok(),
        }
    }

    /// Settings pointing at an explicit URL with no credentials.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Whether credentials were provided.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::with_url(DEFAULT_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_url() {
        let config = StoreConfig::with_url("bolt://graph.internal:7687");
        assert_eq!(config.url, "bolt://graph.internal:7687");
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_default_points_local() {
        let config = StoreConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
    }
}
