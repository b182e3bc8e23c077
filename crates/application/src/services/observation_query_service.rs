//! Observation query service
//!
//! Read-side facade over the observation store. Every read resolves to a
//! [`Lookup`], which keeps "nothing recorded" and "store unreachable" apart;
//! callers that only care about data can collapse it with
//! [`Lookup::into_option`] or [`Lookup::into_vec`].

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

use chrono::{DateTime, Duration, Utc};
use domain::{DomainError, ExportRow, LocationName, WeatherRecord};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::ObservationStorePort};

/// Result of a read against the observation store
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Data was found
    Found(T),
    /// The store answered but holds nothing matching
    Empty,
    /// The store could not be reached
    Unavailable(String),
}

impl<T> Lookup<T> {
    /// Collapse absence and unavailability into `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Transform the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Empty => Lookup::Empty,
            Self::Unavailable(reason) => Lookup::Unavailable(reason),
        }
    }
}

impl<T> Lookup<Vec<T>> {
    /// Collapse absence and unavailability into an empty vector
    pub fn into_vec(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }
}

trait IsEmptyCollection {
    fn is_empty_collection(&self) -> bool;
}

impl<T> IsEmptyCollection for Vec<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsEmptyCollection for BTreeMap<K, V> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmptyCollection for BTreeSet<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

fn lookup_collection<C: IsEmptyCollection>(result: Result<C, ApplicationError>) -> Lookup<C> {
    match result {
        Ok(items) if items.is_empty_collection() => Lookup::Empty,
        Ok(items) => Lookup::Found(items),
        Err(e) => unavailable(&e),
    }
}

fn unavailable<T>(error: &ApplicationError) -> Lookup<T> {
    warn!(error = %error, "Observation store read failed");
    Lookup::Unavailable(error.to_string())
}

/// Convert a window in hours to a duration
///
/// Fractional hours are kept to the millisecond.
///
/// # Errors
///
/// Returns a validation error for negative or non-finite values.
pub fn window_from_hours(hours: f64) -> Result<Duration, ApplicationError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(DomainError::Validation(format!(
            "window must be a non-negative number of hours, got {hours}"
        ))
        .into());
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (hours * 3_600_000.0).round() as i64;
    Ok(Duration::milliseconds(millis))
}

/// Aggregate figures over a set of observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub samples: usize,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub mean_temperature: Option<f64>,
    pub peak_wind_speed: Option<f64>,
}

impl WindowSummary {
    /// Summarize records; `None` when there are none
    ///
    /// Records without a given measurement are ignored for that figure.
    #[must_use]
    pub fn from_records(records: &[WeatherRecord]) -> Option<Self> {
        let first = records.iter().map(|r| r.timestamp).min()?;
        let last = records.iter().map(|r| r.timestamp).max()?;

        let temperatures: Vec<f64> = records.iter().filter_map(|r| r.temperature).collect();
        let mean_temperature = if temperatures.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            let count = temperatures.len() as f64;
            Some(temperatures.iter().sum::<f64>() / count)
        };

        Some(Self {
            samples: records.len(),
            first,
            last,
            max_temperature: temperatures.iter().copied().reduce(f64::max),
            min_temperature: temperatures.iter().copied().reduce(f64::min),
            mean_temperature,
            peak_wind_speed: records
                .iter()
                .filter_map(|r| r.wind_speed)
                .reduce(f64::max),
        })
    }
}

/// Extremes across the latest observation of several locations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonHighlights {
    pub hottest: Option<(LocationName, f64)>,
    pub coldest: Option<(LocationName, f64)>,
    pub windiest: Option<(LocationName, f64)>,
}

impl ComparisonHighlights {
    /// Pick the extremes; ties go to the alphabetically first location
    #[must_use]
    pub fn from_latest(latest: &BTreeMap<LocationName, WeatherRecord>) -> Self {
        let pick = |value: fn(&WeatherRecord) -> Option<f64>, prefer_higher: bool| {
            latest
                .iter()
                .filter_map(|(name, record)| value(record).map(|v| (name, v)))
                .fold(None::<(&LocationName, f64)>, |best, (name, v)| match best {
                    Some((_, current)) if (prefer_higher && v <= current)
                        || (!prefer_higher && v >= current) =>
                    {
                        best
                    },
                    _ => Some((name, v)),
                })
                .map(|(name, v)| (name.clone(), v))
        };

        Self {
            hottest: pick(|r: &WeatherRecord| r.temperature, true),
            coldest: pick(|r: &WeatherRecord| r.temperature, false),
            windiest: pick(|r: &WeatherRecord| r.wind_speed, true),
        }
    }
}

/// Read-side facade over the observation store
pub struct ObservationQueryService {
    store: Arc<dyn ObservationStorePort>,
}

impl fmt::Debug for ObservationQueryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationQueryService")
            .finish_non_exhaustive()
    }
}

impl ObservationQueryService {
    #[must_use]
    pub fn new(store: Arc<dyn ObservationStorePort>) -> Self {
        Self { store }
    }

    /// Latest observation for a location
    #[instrument(skip(self, location), fields(location = %location))]
    pub async fn current(&self, location: &LocationName) -> Lookup<WeatherRecord> {
        match self.store.latest(location).await {
            Ok(Some(record)) => Lookup::Found(record),
            Ok(None) => {
                debug!("No observation recorded");
                Lookup::Empty
            },
            Err(e) => unavailable(&e),
        }
    }

    /// Observations within the trailing window ending now, ascending
    pub async fn history(
        &self,
        location: &LocationName,
        window: Duration,
    ) -> Lookup<Vec<WeatherRecord>> {
        self.history_at(location, window, Utc::now()).await
    }

    /// Observations within the trailing window ending at `now`, ascending
    #[instrument(skip(self, location), fields(location = %location))]
    pub async fn history_at(
        &self,
        location: &LocationName,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Lookup<Vec<WeatherRecord>> {
        lookup_collection(self.store.windowed_at(location, window, now).await)
    }

    /// Latest observation of each requested location that has data
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn compare(
        &self,
        locations: &[LocationName],
    ) -> Lookup<BTreeMap<LocationName, WeatherRecord>> {
        lookup_collection(self.store.latest_many(locations).await)
    }

    /// Every location with stored observations, sorted
    #[instrument(skip(self))]
    pub async fn locations(&self) -> Lookup<BTreeSet<LocationName>> {
        lookup_collection(self.store.distinct_locations().await)
    }

    /// Aggregate figures over the trailing window ending at `now`
    pub async fn summary_at(
        &self,
        location: &LocationName,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Lookup<WindowSummary> {
        match self.history_at(location, window, now).await {
            Lookup::Found(records) => {
                WindowSummary::from_records(&records).map_or(Lookup::Empty, Lookup::Found)
            },
            Lookup::Empty => Lookup::Empty,
            Lookup::Unavailable(reason) => Lookup::Unavailable(reason),
        }
    }

    /// Export rows for the trailing window ending at `now`
    pub async fn export_rows_at(
        &self,
        location: &LocationName,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Lookup<Vec<ExportRow>> {
        self.history_at(location, window, now)
            .await
            .map(|records| records.iter().map(ExportRow::from).collect())
    }
}
