//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the SQLite observation
//! store, live and synthetic weather sources, configuration loading, CSV export
//! and logging setup.

pub mod adapters;
pub mod config;
pub mod export;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, LogFormat, LoggingConfig, OrchestratorAppConfig, ProviderKind,
    WeatherAppConfig,
};
pub use export::{ExportError, to_csv_string, write_csv, write_records_csv};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteDatabaseHealth, SqliteObservationStore, create_pool,
};
pub use telemetry::{TelemetryError, init_logging};
