//! Observation store port
//!
//! Defines the append-only, time-ordered storage the pipeline writes to and
//! the presentation side reads from.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use domain::{LocationName, RecordId, WeatherRecord};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the time-series observation store
///
/// Records are partitioned by location and ordered by timestamp; records with
/// equal timestamps keep their append order. Stored records are never updated
/// or deleted.
///
/// Absence and unavailability are distinct: "no data" is `Ok(None)` or an empty
/// collection, an unreachable backing medium is
/// `Err(ApplicationError::StorageUnavailable)`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObservationStorePort: Send + Sync {
    /// Append one record, returning the identifier the store assigned
    ///
    /// Concurrent appends are safe; a record is written atomically.
    async fn append(&self, record: &WeatherRecord) -> Result<RecordId, ApplicationError>;

    /// Most recent record for a location (ties resolved to the last appended)
    async fn latest(&self, location: &LocationName)
    -> Result<Option<WeatherRecord>, ApplicationError>;

    /// Records with `timestamp >= now - window`, ascending
    async fn windowed_at(
        &self,
        location: &LocationName,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<WeatherRecord>, ApplicationError>;

    /// Records within the trailing window ending at the current instant, ascending
    async fn windowed(
        &self,
        location: &LocationName,
        window: Duration,
    ) -> Result<Vec<WeatherRecord>, ApplicationError> {
        self.windowed_at(location, window, Utc::now()).await
    }

    /// Latest record for each requested location that has any data
    ///
    /// Locations without records are absent from the map.
    async fn latest_many(
        &self,
        locations: &[LocationName],
    ) -> Result<BTreeMap<LocationName, WeatherRecord>, ApplicationError> {
        let mut result = BTreeMap::new();
        for location in locations {
            if let Some(record) = self.latest(location).await? {
                result.insert(location.clone(), record);
            }
        }
        Ok(result)
    }

    /// Every location that has ever been stored
    async fn distinct_locations(&self) -> Result<BTreeSet<LocationName>, ApplicationError>;

    /// Number of stored records for a location
    async fn count(&self, location: &LocationName) -> Result<u64, ApplicationError>;
}
