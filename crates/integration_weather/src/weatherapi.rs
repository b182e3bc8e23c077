//! WeatherAPI client
//!
//! Client for the WeatherAPI current conditions endpoint
//! (<https://www.weatherapi.com/docs/>).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::{
    CurrentConditions, WeatherError,
    client::{WeatherClient, WeatherConfig, build_http_client, round_to_i32, send_for_json},
};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Error code WeatherAPI uses for "No matching location found"
const NO_MATCHING_LOCATION: u32 = 1006;

/// WeatherAPI response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub location: Option<Location>,
        pub current: Current,
    }

    #[derive(Debug, Deserialize)]
    pub struct Location {
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub temp_c: f64,
        pub humidity: f64,
        pub pressure_mb: f64,
        pub wind_kph: f64,
        pub condition: Condition,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub text: String,
        pub icon: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub code: u32,
    }
}

/// WeatherAPI HTTP client
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    config: WeatherConfig,
    base_url: String,
}

impl WeatherApiClient {
    /// Create a new WeatherAPI client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(&config)?;
        let base_url = config.base_url_or(DEFAULT_BASE_URL);
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// WeatherAPI reports unknown locations as HTTP 400 with error code 1006
    fn classify(status: StatusCode, location: &str, body: &str) -> WeatherError {
        let unknown_location = status == StatusCode::BAD_REQUEST
            && serde_json::from_str::<api::ErrorEnvelope>(body)
                .is_ok_and(|envelope| envelope.error.code == NO_MATCHING_LOCATION);
        if unknown_location {
            return WeatherError::LocationNotFound(location.to_string());
        }
        WeatherError::from_status(status, location, body)
    }

    fn convert(response: api::CurrentResponse) -> CurrentConditions {
        let current = response.current;
        CurrentConditions {
            resolved_name: response.location.map(|l| l.name),
            fetched_at: Utc::now(),
            temperature: current.temp_c,
            humidity: round_to_i32(current.humidity),
            pressure: round_to_i32(current.pressure_mb),
            wind_speed_kmh: current.wind_kph,
            condition: Some(current.condition.text.clone()),
            description: Some(current.condition.text),
            icon: current.condition.icon,
        }
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(provider = "weatherapi"))]
    async fn current(&self, location: &str) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/current.json", self.base_url);
        debug!(url = %url, "Fetching current weather");

        let request = self.client.get(&url).query(&[
            ("key", self.config.api_key.as_str()),
            ("q", location),
            ("aqi", "no"),
            ("lang", self.config.language.as_str()),
        ]);

        let response: api::CurrentResponse =
            send_for_json(request, location, Self::classify).await?;

        Ok(Self::convert(response))
    }

    fn provider_name(&self) -> &'static str {
        "weatherapi"
    }
}
