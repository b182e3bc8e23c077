//! Weather source ports
//!
//! Defines how the orchestrator obtains observations: a live, fallible fetcher
//! and an infallible synthetic generator with the same output shape.

use async_trait::async_trait;
use domain::{LocationName, WeatherRecord};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for live weather providers
///
/// Implementations normalize units to Celsius, km/h, hPa and integer percent,
/// stamp the record at the moment of a successful fetch and enforce their own
/// request timeout. A timeout is reported like any other failure.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherFetcherPort: Send + Sync {
    /// Fetch the current observation for a location
    async fn fetch(&self, location: &LocationName) -> Result<WeatherRecord, ApplicationError>;

    /// Short provider identifier used for provenance and logs
    fn provider_name(&self) -> &'static str;
}

/// Port for locally generated observations
///
/// Used when no provider is configured, when a fetch fails, or when the caller
/// asks for offline operation.
#[cfg_attr(test, automock)]
pub trait SyntheticWeatherPort: Send + Sync {
    /// Generate a plausible observation for a location, stamped now
    fn generate(&self, location: &LocationName) -> WeatherRecord;
}
