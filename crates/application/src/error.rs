//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error, including record validation failures
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Upstream weather provider unreachable, timed out or returned unusable data
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Backing store could not be reached or refused the operation
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::FetchFailed(_) | ApplicationError::StorageUnavailable(_)
        )
    }

    /// Check if this error is a record validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApplicationError::Domain(DomainError::Validation(_) | DomainError::InvalidLocation(_))
        )
    }
}
