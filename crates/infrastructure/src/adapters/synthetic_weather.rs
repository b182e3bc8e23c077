//! Synthetic weather generator - Implements SyntheticWeatherPort
//!
//! Produces plausible observations around a per-location baseline temperature.
//! Used offline, without provider credentials, and as the fallback when a live
//! fetch fails.

use std::fmt;

use application::ports::SyntheticWeatherPort;
use chrono::Utc;
use domain::{LocationName, RecordSource, WeatherRecord};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

/// Typical temperature (Celsius) for each known location
pub const BASELINE_TEMPERATURES: [(&str, f64); 32] = [
    ("Casablanca", 19.0),
    ("Rabat", 18.0),
    ("Marrakech", 22.0),
    ("Fès", 17.0),
    ("Tanger", 16.0),
    ("Agadir", 21.0),
    ("Meknès", 16.0),
    ("Oujda", 15.0),
    ("Tétouan", 17.0),
    ("Kenitra", 18.0),
    ("Essaouira", 18.0),
    ("El Jadida", 19.0),
    ("Safi", 19.0),
    ("Mohammedia", 19.0),
    ("Larache", 17.0),
    ("Asilah", 17.0),
    ("Nador", 17.0),
    ("Al Hoceima", 18.0),
    ("Béni Mellal", 18.0),
    ("Khouribga", 17.0),
    ("Taza", 16.0),
    ("Khemisset", 16.0),
    ("Settat", 18.0),
    ("Laâyoune", 22.0),
    ("Dakhla", 21.0),
    ("Guelmim", 23.0),
    ("Tan-Tan", 22.0),
    ("Taroudant", 21.0),
    ("Ouarzazate", 20.0),
    ("Errachidia", 19.0),
    ("Ifrane", 12.0),
    ("Ksar El Kebir", 17.0),
];

/// Baseline for locations missing from the table
pub const DEFAULT_BASELINE: f64 = 20.0;

/// Maximum deviation from the baseline temperature
const TEMPERATURE_SPREAD: f64 = 3.0;

const CONDITIONS: [&str; 4] = ["Ensoleillé", "Nuageux", "Pluie", "Brume"];

const DESCRIPTIONS: [&str; 5] = [
    "ciel dégagé",
    "quelques nuages",
    "nuages épars",
    "pluie légère",
    "brume",
];

const ICON: &str = "01d";

/// Baseline temperature for a location (exact name match)
#[must_use]
pub fn baseline_temperature(location: &LocationName) -> f64 {
    BASELINE_TEMPERATURES
        .iter()
        .find(|(name, _)| *name == location.as_str())
        .map_or(DEFAULT_BASELINE, |(_, celsius)| *celsius)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Synthetic observation source around per-location baselines
pub struct SyntheticWeatherGenerator {
    rng: Mutex<StdRng>,
}

impl fmt::Debug for SyntheticWeatherGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticWeatherGenerator")
            .finish_non_exhaustive()
    }
}

impl SyntheticWeatherGenerator {
    /// Generator seeded from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic generator, for tests and reproducible demos
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticWeatherGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticWeatherPort for SyntheticWeatherGenerator {
    fn generate(&self, location: &LocationName) -> WeatherRecord {
        let baseline = baseline_temperature(location);
        let mut rng = self.rng.lock();

        let temperature =
            round_tenth(baseline + rng.random_range(-TEMPERATURE_SPREAD..=TEMPERATURE_SPREAD));
        let humidity = rng.random_range(40..=80);
        let pressure = rng.random_range(1005..=1020);
        let wind_speed = round_tenth(rng.random_range(5.0..=25.0));
        let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
        let description = DESCRIPTIONS[rng.random_range(0..DESCRIPTIONS.len())];
        drop(rng);

        debug!(location = %location, baseline, temperature, "Generated synthetic observation");

        WeatherRecord::new(location.clone(), Utc::now())
            .with_temperature(temperature)
            .with_humidity(humidity)
            .with_pressure(pressure)
            .with_wind_speed(wind_speed)
            .with_condition(condition)
            .with_description(description)
            .with_icon(ICON)
            .with_source(RecordSource::Synthetic)
    }
}
