//! Weather provider configuration.

use std::{fmt, str::FromStr};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Supported live weather providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenWeatherMap current weather API
    #[default]
    #[serde(alias = "openweathermap")]
    OpenWeather,
    /// WeatherAPI.com current conditions API
    WeatherApi,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWeather => write!(f, "openweather"),
            Self::WeatherApi => write!(f, "weatherapi"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openweather" | "openweathermap" => Ok(Self::OpenWeather),
            "weatherapi" => Ok(Self::WeatherApi),
            _ => Err(format!(
                "Invalid weather provider: {s}. Use 'openweather' or 'weatherapi'"
            )),
        }
    }
}

/// Weather provider configuration
///
/// Without an API key the pipeline runs on synthetic data only.
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// Which provider to query
    #[serde(default)]
    pub provider: ProviderKind,

    /// Provider API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Base URL override, mainly for tests and proxies
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// Language for provider descriptions (default: "fr")
    #[serde(default = "default_language")]
    pub language: String,
}

impl fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("language", &self.language)
            .finish()
    }
}

const fn default_weather_timeout() -> u64 {
    10
}

fn default_language() -> String {
    "fr".to_string()
}

impl Default for WeatherAppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            timeout_secs: default_weather_timeout(),
            language: default_language(),
        }
    }
}

impl WeatherAppConfig {
    /// The API key, if one is configured and non-blank
    #[must_use]
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
    }

    /// Whether live fetching is possible
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.api_key_str().is_some()
    }

    /// Convert to `integration_weather`'s `WeatherConfig`
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn to_weather_config(&self) -> Option<integration_weather::WeatherConfig> {
        let api_key = self.api_key_str()?;
        let mut config = integration_weather::WeatherConfig::new(api_key)
            .with_timeout_secs(self.timeout_secs)
            .with_language(self.language.clone());
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Some(config)
    }
}
