//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod observation_store_port;
mod weather_fetcher_port;

#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use observation_store_port::MockObservationStorePort;
pub use observation_store_port::ObservationStorePort;
#[cfg(test)]
pub use weather_fetcher_port::{MockSyntheticWeatherPort, MockWeatherFetcherPort};
pub use weather_fetcher_port::{SyntheticWeatherPort, WeatherFetcherPort};
