//! Provider fetcher adapter - Implements WeatherFetcherPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::WeatherFetcherPort;
use async_trait::async_trait;
use domain::{LocationName, RecordSource, WeatherRecord};
use integration_weather::{
    CurrentConditions, OpenWeatherMapClient, WeatherApiClient, WeatherClient, WeatherError,
};
use tracing::{debug, info, instrument};

use crate::config::{ProviderKind, WeatherAppConfig};

/// Adapter from a provider client to the fetcher port
///
/// The provider is chosen once when the adapter is built.
pub struct ProviderFetcherAdapter {
    client: Box<dyn WeatherClient>,
}

impl std::fmt::Debug for ProviderFetcherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFetcherAdapter")
            .field("provider", &self.client.provider_name())
            .finish()
    }
}

impl ProviderFetcherAdapter {
    /// Wrap an existing provider client
    #[must_use]
    pub fn new(client: impl WeatherClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Build the adapter for the configured provider
    ///
    /// Returns `Ok(None)` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &WeatherAppConfig) -> Result<Option<Self>, ApplicationError> {
        let Some(client_config) = config.to_weather_config() else {
            return Ok(None);
        };

        let adapter = match config.provider {
            ProviderKind::OpenWeather => OpenWeatherMapClient::new(client_config).map(Self::new),
            ProviderKind::WeatherApi => WeatherApiClient::new(client_config).map(Self::new),
        }
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Some(adapter))
    }

    /// Map integration weather error to application error
    fn map_error(err: &WeatherError) -> ApplicationError {
        ApplicationError::FetchFailed(err.to_string())
    }

    /// Convert provider conditions into a record for the requested location
    fn to_record(
        location: &LocationName,
        conditions: CurrentConditions,
        provider: &'static str,
    ) -> WeatherRecord {
        let mut record = WeatherRecord::new(location.clone(), conditions.fetched_at)
            .with_temperature(conditions.temperature)
            .with_humidity(conditions.humidity)
            .with_pressure(conditions.pressure)
            .with_wind_speed(conditions.wind_speed_kmh)
            .with_source(RecordSource::provider(provider));
        record.condition = conditions.condition;
        record.description = conditions.description;
        record.icon = conditions.icon;
        record
    }
}

#[async_trait]
impl WeatherFetcherPort for ProviderFetcherAdapter {
    #[instrument(skip(self, location), fields(location = %location, provider = self.client.provider_name()))]
    async fn fetch(&self, location: &LocationName) -> Result<WeatherRecord, ApplicationError> {
        let conditions = self
            .client
            .current(location.as_str())
            .await
            .map_err(|e| Self::map_error(&e))?;

        if let Some(resolved) = conditions
            .resolved_name
            .as_deref()
            .filter(|resolved| *resolved != location.as_str())
        {
            debug!(resolved = %resolved, "Provider resolved location under a different name");
        }

        Ok(Self::to_record(
            location,
            conditions,
            self.client.provider_name(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }
}

/// Build the live fetcher selected by configuration
///
/// `Ok(None)` means no credentials are configured and every refresh will use
/// synthetic data.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to initialize.
pub fn build_fetcher(
    config: &WeatherAppConfig,
) -> Result<Option<Arc<dyn WeatherFetcherPort>>, ApplicationError> {
    let fetcher = ProviderFetcherAdapter::from_config(config)?;
    match &fetcher {
        Some(adapter) => info!(provider = adapter.provider_name(), "Live weather provider enabled"),
        None => info!("No weather API key configured, using synthetic data"),
    }
    Ok(fetcher.map(|adapter| Arc::new(adapter) as Arc<dyn WeatherFetcherPort>))
}
