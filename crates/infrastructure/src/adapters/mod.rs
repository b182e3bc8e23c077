//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod provider_fetcher_adapter;
mod synthetic_weather;

pub use provider_fetcher_adapter::{ProviderFetcherAdapter, build_fetcher};
pub use synthetic_weather::{
    BASELINE_TEMPERATURES, DEFAULT_BASELINE, SyntheticWeatherGenerator, baseline_temperature,
};
