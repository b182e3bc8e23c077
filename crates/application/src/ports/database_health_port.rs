//! Store connectivity port
//!
//! Read operations on the observation store can degrade to "no data". This port
//! is the out-of-band signal that tells a caller whether the store is reachable
//! at all, so "nothing recorded yet" and "store down" can be told apart.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Store health information
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    /// Whether the store is reachable and answering queries
    pub reachable: bool,
    /// Engine version (if available)
    pub version: Option<String>,
    /// Current connection pool size
    pub pool_size: Option<u32>,
    /// Total stored records
    pub record_count: Option<u64>,
    /// Response time of the check in milliseconds
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// Reachable store without details
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            reachable: true,
            version: None,
            pool_size: None,
            record_count: None,
            response_time_ms: None,
        }
    }

    /// Reachable store with engine version
    #[must_use]
    pub fn healthy_with_version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Self::healthy()
        }
    }

    /// Unreachable store
    #[must_use]
    pub const fn unhealthy() -> Self {
        Self {
            reachable: false,
            version: None,
            pool_size: None,
            record_count: None,
            response_time_ms: None,
        }
    }

    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    #[must_use]
    pub const fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = Some(size);
        self
    }

    #[must_use]
    pub const fn with_record_count(mut self, count: u64) -> Self {
        self.record_count = Some(count);
        self
    }
}

/// Port for store connectivity checks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Lightweight reachability probe (e.g. `SELECT 1`)
    async fn is_available(&self) -> bool;

    /// Detailed health information
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
