//! Database (SQLite) configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (`:memory:` for an in-memory store)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of concurrent database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup (default: true)
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Seconds to wait for a pooled connection before giving up (default: 5)
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Milliseconds SQLite waits on a locked database (default: 5000)
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,
}

impl DatabaseConfig {
    /// In-memory database, mainly for tests
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    /// Whether the configuration points at an in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

fn default_db_path() -> String {
    "climatrack.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_connection_timeout() -> u64 {
    5
}

const fn default_busy_timeout() -> u32 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
            connection_timeout_secs: default_connection_timeout(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}
