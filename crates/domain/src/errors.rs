//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A record or one of its identifying fields failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A location name was empty or blank
    #[error("Invalid location name: {0:?}")]
    InvalidLocation(String),

    /// A stored value could not be decoded back into the model
    #[error("Invalid stored value for {field}: {value}")]
    InvalidStoredValue { field: String, value: String },
}

impl DomainError {
    /// Create a stored-value decoding error
    pub fn invalid_stored(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidStoredValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
