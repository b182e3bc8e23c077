//! Persistence module
//!
//! SQLite-backed append-only storage for weather observations.

pub mod connection;
pub mod database_health;
pub mod migrations;
pub mod observation_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use database_health::SqliteDatabaseHealth;
pub use observation_store::SqliteObservationStore;
