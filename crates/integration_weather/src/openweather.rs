//! OpenWeatherMap client
//!
//! Client for the OpenWeatherMap current weather endpoint
//! (<https://openweathermap.org/current>).

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::{
    CurrentConditions, WeatherError,
    client::{WeatherClient, WeatherConfig, build_http_client, round_to_i32, send_for_json},
    models::ms_to_kmh,
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap API response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub name: Option<String>,
        pub main: Main,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub wind: Wind,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: f64,
        pub humidity: f64,
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
        pub description: String,
        pub icon: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        /// Meters per second with `units=metric`
        pub speed: f64,
    }
}

/// OpenWeatherMap HTTP client
#[derive(Debug)]
pub struct OpenWeatherMapClient {
    client: Client,
    config: WeatherConfig,
    base_url: String,
}

impl OpenWeatherMapClient {
    /// Create a new OpenWeatherMap client
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

    fn convert(response: api::CurrentResponse) -> CurrentConditions {
        let condition = response.weather.into_iter().next();
        CurrentConditions {
            resolved_name: response.name,
            fetched_at: Utc::now(),
            temperature: response.main.temp,
            humidity: round_to_i32(response.main.humidity),
            pressure: round_to_i32(response.main.pressure),
            wind_speed_kmh: ms_to_kmh(response.wind.speed),
            condition: condition.as_ref().map(|c| c.main.clone()),
            description: condition.as_ref().map(|c| c.description.clone()),
            icon: condition.and_then(|c| c.icon),
        }
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherMapClient {
    #[instrument(skip(self), fields(provider = "openweather"))]
    async fn current(&self, location: &str) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        debug!(url = %url, "Fetching current weather");

        let request = self.client.get(&url).query(&[
            ("q", location),
            ("appid", self.config.api_key.as_str()),
            ("units", "metric"),
            ("lang", self.config.language.as_str()),
        ]);

        let response: api::CurrentResponse =
            send_for_json(request, location, WeatherError::from_status).await?;

        Ok(Self::convert(response))
    }

    fn provider_name(&self) -> &'static str {
        "openweather"
    }
}
