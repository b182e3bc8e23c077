//! Database migrations
//!
//! Manages database schema versioning and migrations.
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vX` function
//! 3. Call it from `run_migrations`

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(
                    version = 1,
                    error = %e,
                    "Migration V001 (weather records) failed"
                );
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: append-only weather records
///
/// `timestamp_ns` holds nanoseconds since the Unix epoch so range scans and
/// ordering happen on integers without losing precision. `seq` breaks timestamp ties in append order.
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Weather records");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS weather_records (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            location TEXT NOT NULL CHECK (length(trim(location)) > 0),
            timestamp_ns INTEGER NOT NULL,
            temperature REAL,
            humidity INTEGER,
            pressure INTEGER,
            wind_speed REAL,
            condition TEXT,
            description TEXT,
            icon TEXT,
            source TEXT NOT NULL DEFAULT 'unspecified'
        );

        CREATE INDEX IF NOT EXISTS idx_weather_records_location_time
            ON weather_records(location, timestamp_ns, seq);

        CREATE TRIGGER IF NOT EXISTS weather_records_no_update
            BEFORE UPDATE ON weather_records
        BEGIN
            SELECT RAISE(ABORT, 'weather records are append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS weather_records_no_delete
            BEFORE DELETE ON weather_records
        BEGIN
            SELECT RAISE(ABORT, 'weather records are append-only');
        END;
        ",
    )?;

    Ok(())
}
