//! Weather data models
//!
//! Provider-neutral current conditions, already in canonical units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Location name as resolved by the provider
    pub resolved_name: Option<String>,
    /// Moment the response was received
    pub fetched_at: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: i32,
    /// Pressure in hPa
    pub pressure: i32,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Short category label
    pub condition: Option<String>,
    /// Localized free-text description
    pub description: Option<String>,
    /// Provider icon code or URL
    pub icon: Option<String>,
}

/// Convert meters per second to kilometers per hour
#[must_use]
pub fn ms_to_kmh(meters_per_second: f64) -> f64 {
    meters_per_second * 3.6
}
