//! SQLite database health adapter
//!
//! Implements the `DatabaseHealthPort` for the observation store's SQLite
//! database using the connection pool.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::ConnectionPool;

/// SQLite database health adapter
///
/// Provides health checking for SQLite databases using the r2d2 connection pool.
pub struct SqliteDatabaseHealth {
    pool: Arc<ConnectionPool>,
}

impl std::fmt::Debug for SqliteDatabaseHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabaseHealth")
            .field("pool", &"<ConnectionPool>")
            .finish()
    }
}

impl SqliteDatabaseHealth {
    /// Create a new database health adapter with the given connection pool
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        let pool = Arc::clone(&self.pool);
        let result = tokio::task::spawn_blocking(move || {
            pool.get()
                .ok()
                .and_then(|conn| {
                    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
                        .ok()
                })
                .is_some()
        })
        .await;

        match result {
            Ok(available) => {
                if available {
                    debug!("Database health check passed");
                } else {
                    warn!("Database health check failed: unable to execute query");
                }
                available
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed: task panicked");
                false
            },
        }
    }

    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let start = std::time::Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| {
                ApplicationError::StorageUnavailable(format!(
                    "Failed to get database connection: {e}"
                ))
            })?;

            let _: i32 = conn
                .query_row("SELECT 1", [], |row| row.get(0))
                .map_err(|e| {
                    ApplicationError::StorageUnavailable(format!("Health check query failed: {e}"))
                })?;

            let version: String = conn
                .query_row("SELECT sqlite_version()", [], |row| row.get(0))
                .unwrap_or_else(|_| "unknown".to_string());

            let record_count: i64 = conn
                .query_row("SELECT COUNT(*) FROM weather_records", [], |row| row.get(0))
                .map_err(|e| {
                    ApplicationError::StorageUnavailable(format!("Record count failed: {e}"))
                })?;

            let pool_size = pool.state().connections;

            Ok::<_, ApplicationError>((version, pool_size, u64::try_from(record_count).unwrap_or(0)))
        })
        .await
        .map_err(|e| {
            ApplicationError::Internal(format!("Database health check task failed: {e}"))
        })?;

        match result {
            Ok((version, pool_size, record_count)) => {
                // bounded by the pool's connection timeout
                #[allow(clippy::cast_possible_truncation)]
                let response_time_ms = start.elapsed().as_millis() as u64;

                debug!(
                    version = %version,
                    pool_size = pool_size,
                    record_count = record_count,
                    response_time_ms = response_time_ms,
                    "Database health check passed"
                );

                Ok(
                    DatabaseHealth::healthy_with_version(format!("SQLite {version}"))
                        .with_pool_size(pool_size)
                        .with_record_count(record_count)
                        .with_response_time(response_time_ms),
                )
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                Err(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use application::ports::ObservationStorePort;
    use domain::{LocationName, WeatherRecord};

    use super::*;
    use crate::{
        config::DatabaseConfig,
        persistence::{SqliteObservationStore, create_pool},
    };

    fn create_test_pool() -> Arc<ConnectionPool> {
        Arc::new(create_pool(&DatabaseConfig::in_memory()).expect("Failed to create pool"))
    }

    #[tokio::test]
    async fn is_available_returns_true_for_healthy_db() {
        let health = SqliteDatabaseHealth::new(create_test_pool());
        assert!(health.is_available().await);
    }

    #[tokio::test]
    async fn check_health_returns_version_info() {
        let health = SqliteDatabaseHealth::new(create_test_pool());

        let db_health = health.check_health().await.unwrap();
        assert!(db_health.reachable);
        assert!(db_health.version.unwrap().contains("SQLite"));
        assert!(db_health.pool_size.is_some());
        assert!(db_health.response_time_ms.is_some());
    }

    #[tokio::test]
    async fn check_health_counts_records() {
        let pool = create_test_pool();
        let store = SqliteObservationStore::new(Arc::clone(&pool));
        let health = SqliteDatabaseHealth::new(pool);

        assert_eq!(health.check_health().await.unwrap().record_count, Some(0));

        let location = LocationName::new("Oujda").unwrap();
        store.append(&WeatherRecord::now(location.clone())).await.unwrap();
        store.append(&WeatherRecord::now(location)).await.unwrap();

        assert_eq!(health.check_health().await.unwrap().record_count, Some(2));
    }

    #[tokio::test]
    async fn missing_schema_is_reported_as_unavailable() {
        let config = DatabaseConfig {
            run_migrations: false,
            ..DatabaseConfig::in_memory()
        };
        let health = SqliteDatabaseHealth::new(Arc::new(create_pool(&config).unwrap()));

        let result = health.check_health().await;
        assert!(matches!(result, Err(ApplicationError::StorageUnavailable(_))));
    }

    #[test]
    fn debug_impl_works() {
        let health = SqliteDatabaseHealth::new(create_test_pool());
        let debug_str = format!("{health:?}");
        assert!(debug_str.contains("SqliteDatabaseHealth"));
    }
}
