//! Weather client trait and shared HTTP plumbing

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{CurrentConditions, WeatherError};

/// Trait for current-conditions providers
///
/// Implemented by every provider backend (OpenWeatherMap, WeatherAPI).
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch current conditions for a location name
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the payload cannot
    /// be parsed.
    async fn current(&self, location: &str) -> Result<CurrentConditions, WeatherError>;

    /// Get the provider name (e.g., "openweather", "weatherapi")
    fn provider_name(&self) -> &'static str;
}

/// Provider client configuration
#[derive(Clone)]
pub struct WeatherConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Base URL override; each client has its own default
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// Language code for localized descriptions (default: "fr")
    pub language: String,
}

impl WeatherConfig {
    /// Configuration with default timeout and language
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: 10,
            language: "fr".to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Configured base URL or the provider default, without trailing slash
    pub(crate) fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .finish()
    }
}

/// Build the HTTP client with the configured request timeout
pub(crate) fn build_http_client(config: &WeatherConfig) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))
}

/// Send a request and decode a JSON body
///
/// Non-success statuses are turned into errors by `classify`, which sees the
/// status, the requested location and the response body.
pub(crate) async fn send_for_json<T: DeserializeOwned>(
    request: RequestBuilder,
    location: &str,
    classify: fn(StatusCode, &str, &str) -> WeatherError,
) -> Result<T, WeatherError> {
    let response = request
        .send()
        .await
        .map_err(|e| WeatherError::from_transport(&e))?;

    let status = response.status();
    debug!(status = %status, "Received weather response");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify(status, location, &body));
    }

    response
        .json()
        .await
        .map_err(|e| WeatherError::ParseError(e.to_string()))
}

/// Round a provider value to the nearest integer
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}
