//! Current-conditions weather integrations
//!
//! Clients for OpenWeatherMap (<https://openweathermap.org>) and WeatherAPI
//! (<https://www.weatherapi.com>). Both normalize their payloads to
//! [`CurrentConditions`] in metric units with wind speed in km/h.

pub mod client;
mod error;
mod models;
pub mod openweather;
pub mod weatherapi;

pub use client::{WeatherClient, WeatherConfig};
pub use error::WeatherError;
pub use models::{CurrentConditions, ms_to_kmh};
pub use openweather::OpenWeatherMapClient;
pub use weatherapi::WeatherApiClient;
