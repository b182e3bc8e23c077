//! Weather integration error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching current conditions
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed or timed out
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API key missing, invalid or not allowed for this endpoint
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The provider does not know the requested location
    #[error("Location not found: {0}")]
    LocationNotFound(String),
}

impl WeatherError {
    /// Returns true if a later attempt may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::ServiceUnavailable(_) | Self::RateLimitExceeded
        )
    }

    /// Map a transport-level failure
    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::ConnectionFailed(format!("request timed out: {error}"))
        } else if error.is_connect() {
            Self::ConnectionFailed(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Map a non-success HTTP status
    pub(crate) fn from_status(status: StatusCode, location: &str, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized(format!("HTTP {status}"))
            },
            StatusCode::NOT_FOUND => Self::LocationNotFound(location.to_string()),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            s if s.is_server_error() => Self::ServiceUnavailable(format!("HTTP {status}")),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}
