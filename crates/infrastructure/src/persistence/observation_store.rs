//! SQLite observation store implementation
//!
//! Implements the `ObservationStorePort` on the append-only `weather_records`
//! table. Each call runs on the blocking pool with its own pooled connection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use application::{error::ApplicationError, ports::ObservationStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use domain::{DomainError, LocationName, RecordId, RecordSource, WeatherRecord};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

const SELECT_COLUMNS: &str = "seq, location, timestamp_ns, temperature, humidity, pressure, \
                              wind_speed, condition, description, icon, source";

/// SQLite-based observation store
#[derive(Debug, Clone)]
pub struct SqliteObservationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteObservationStore {
    /// Create a new SQLite observation store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Run a query on a pooled connection off the async runtime
    async fn with_connection<T, F>(&self, f: F) -> Result<T, ApplicationError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> Result<T, ApplicationError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| {
                ApplicationError::StorageUnavailable(format!("Failed to get connection: {e}"))
            })?;
            f(&conn)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

#[async_trait]
impl ObservationStorePort for SqliteObservationStore {
    #[instrument(skip(self, record), fields(location = %record.location))]
    async fn append(&self, record: &WeatherRecord) -> Result<RecordId, ApplicationError> {
        record.validate()?;
        let timestamp_ns = record.timestamp.timestamp_nanos_opt().ok_or_else(|| {
            DomainError::Validation(format!(
                "timestamp {} is outside the storable range",
                record.timestamp
            ))
        })?;
        let record = record.clone();

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO weather_records
                    (location, timestamp_ns, temperature, humidity, pressure, wind_speed,
                     condition, description, icon, source)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.location.as_str(),
                    timestamp_ns,
                    record.temperature,
                    record.humidity,
                    record.pressure,
                    record.wind_speed,
                    record.condition,
                    record.description,
                    record.icon,
                    record.source.to_string(),
                ],
            )
            .map_err(query_error)?;

            let id = RecordId::new(conn.last_insert_rowid());
            debug!(record_id = %id, "Appended weather record");
            Ok(id)
        })
        .await
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn latest(
        &self,
        location: &LocationName,
    ) -> Result<Option<WeatherRecord>, ApplicationError> {
        let location = location.clone();
        self.with_connection(move |conn| latest_for(conn, &location))
            .await
    }

    #[instrument(skip(self, location), fields(location = %location, window_secs = window.num_seconds()))]
    async fn windowed_at(
        &self,
        location: &LocationName,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<WeatherRecord>, ApplicationError> {
        let location = location.clone();
        let cutoff_ns = cutoff_nanos(now, window);

        self.with_connection(move |conn| {
            let mut stmt = conn
                .prepare_cached(&format!(
                    "SELECT {SELECT_COLUMNS} FROM weather_records
                     WHERE location = ?1 AND timestamp_ns >= ?2
                     ORDER BY timestamp_ns ASC, seq ASC"
                ))
                .map_err(query_error)?;

            let records = stmt
                .query_map(params![location.as_str(), cutoff_ns], row_to_record)
                .map_err(query_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(query_error)?;

            debug!(count = records.len(), "Loaded windowed records");
            Ok(records)
        })
        .await
    }

    #[instrument(skip(self, locations), fields(requested = locations.len()))]
    async fn latest_many(
        &self,
        locations: &[LocationName],
    ) -> Result<BTreeMap<LocationName, WeatherRecord>, ApplicationError> {
        let locations = locations.to_vec();

        self.with_connection(move |conn| {
            let mut result = BTreeMap::new();
            for location in locations {
                if let Some(record) = latest_for(conn, &location)? {
                    result.insert(location, record);
                }
            }
            debug!(found = result.len(), "Loaded latest records");
            Ok(result)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn distinct_locations(&self) -> Result<BTreeSet<LocationName>, ApplicationError> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare_cached("SELECT DISTINCT location FROM weather_records")
                .map_err(query_error)?;

            let names = stmt
                .query_map([], |row| {
                    let raw: String = row.get(0)?;
                    LocationName::new(&raw).map_err(|e| decode_error(0, Type::Text, e))
                })
                .map_err(query_error)?
                .collect::<Result<BTreeSet<_>, _>>()
                .map_err(query_error)?;

            Ok(names)
        })
        .await
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn count(&self, location: &LocationName) -> Result<u64, ApplicationError> {
        let location = location.clone();
        self.with_connection(move |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM weather_records WHERE location = ?1",
                    [location.as_str()],
                    |row| row.get(0),
                )
                .map_err(query_error)?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}

/// Window start in stored nanoseconds, clamped to the representable range
fn cutoff_nanos(now: DateTime<Utc>, window: Duration) -> i64 {
    match now.checked_sub_signed(window) {
        Some(cutoff) => cutoff.timestamp_nanos_opt().unwrap_or(if cutoff.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        }),
        None if window > Duration::zero() => i64::MIN,
        None => i64::MAX,
    }
}

/// Most recent record for one location; equal timestamps go to the last append
fn latest_for(
    conn: &rusqlite::Connection,
    location: &LocationName,
) -> Result<Option<WeatherRecord>, ApplicationError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_records
             WHERE location = ?1
             ORDER BY timestamp_ns DESC, seq DESC
             LIMIT 1"
        ))
        .map_err(query_error)?;

    stmt.query_row([location.as_str()], row_to_record)
        .optional()
        .map_err(query_error)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<WeatherRecord> {
    let seq: i64 = row.get(0)?;
    let location: String = row.get(1)?;
    let timestamp_ns: i64 = row.get(2)?;
    let source: String = row.get(10)?;

    let location = LocationName::new(&location).map_err(|e| decode_error(1, Type::Text, e))?;
    let timestamp = DateTime::<Utc>::from_timestamp_nanos(timestamp_ns);
    let source: RecordSource = source
        .parse()
        .map_err(|e| decode_error(10, Type::Text, e))?;

    Ok(WeatherRecord {
        id: Some(RecordId::new(seq)),
        location,
        timestamp,
        temperature: row.get(3)?,
        humidity: row.get(4)?,
        pressure: row.get(5)?,
        wind_speed: row.get(6)?,
        condition: row.get(7)?,
        description: row.get(8)?,
        icon: row.get(9)?,
        source,
    })
}

fn decode_error(column: usize, column_type: Type, error: DomainError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, column_type, Box::new(error))
}

/// Undecodable rows are internal faults; everything else means the store is unusable
fn query_error(error: rusqlite::Error) -> ApplicationError {
    match error {
        rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
            ApplicationError::Internal(format!("Corrupt stored record: {source}"))
        },
        other => ApplicationError::StorageUnavailable(other.to_string()),
    }
}
