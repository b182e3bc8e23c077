//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `weather`: Live provider selection and credentials
//! - `orchestrator`: Batch refresh settings
//! - `logging`: Log filter and output format
//!
//! Sources, lowest priority first: built-in defaults, the legacy
//! `WEATHER_API_KEY` / `WEATHER_API_PROVIDER` variables, an optional
//! `climatrack.toml`, then `CLIMATRACK_*` variables with `__` between nested
//! keys (e.g. `CLIMATRACK_DATABASE__PATH`).

mod database;
mod logging;
mod orchestrator;
mod weather;

use std::{collections::HashMap, path::Path};

use domain::LocationName;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use orchestrator::OrchestratorAppConfig;
pub use weather::{ProviderKind, WeatherAppConfig};

use crate::adapters::BASELINE_TEMPERATURES;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

const ENV_PREFIX: &str = "CLIMATRACK";
const DEFAULT_CONFIG_NAME: &str = "climatrack";
const LEGACY_API_KEY_VAR: &str = "WEATHER_API_KEY";
const LEGACY_PROVIDER_VAR: &str = "WEATHER_API_PROVIDER";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Observation store
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Live weather provider
    #[serde(default)]
    pub weather: WeatherAppConfig,

    /// Tracked locations, refreshed in this order
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,

    /// Batch refresh settings
    #[serde(default)]
    pub orchestrator: OrchestratorAppConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_locations() -> Vec<String> {
    BASELINE_TEMPERATURES
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            weather: WeatherAppConfig::default(),
            locations: default_locations(),
            orchestrator: OrchestratorAppConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional `climatrack.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None, None)
    }

    /// Load configuration from an explicit file plus environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::load_with(Some(path.as_ref()), None)
    }

    /// Load with an optional file and an optional environment snapshot
    ///
    /// `env` replaces the process environment when given.
    pub fn load_with(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let legacy_var = |name: &str| match &env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };

        let mut builder = config::Config::builder();

        // Legacy variables only fill gaps left by the other sources
        if let Some(key) = legacy_var(LEGACY_API_KEY_VAR) {
            builder = builder.set_default("weather.api_key", key)?;
        }
        if let Some(provider) = legacy_var(LEGACY_PROVIDER_VAR) {
            builder = builder.set_default("weather.provider", provider)?;
        }

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("locations")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(
            locations = config.locations.len(),
            provider = %config.weather.provider,
            live = config.weather.has_credentials(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Tracked locations as validated names, duplicates removed
    pub fn location_names(&self) -> Result<Vec<LocationName>, config::ConfigError> {
        let mut names: Vec<LocationName> = Vec::with_capacity(self.locations.len());
        for raw in &self.locations {
            let name = LocationName::new(raw)
                .map_err(|e| config::ConfigError::Message(format!("locations: {e}")))?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load_with(None, env(&[])).unwrap();
        assert_eq!(config.database.path, "climatrack.db");
        assert_eq!(config.weather.provider, ProviderKind::OpenWeather);
        assert!(!config.weather.has_credentials());
        assert_eq!(config.locations.len(), 32);
        assert_eq!(config.locations[0], "Casablanca");
        assert_eq!(config.orchestrator.refresh_interval_secs, 60);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn file_values_are_read() {
        let file = toml_file(
            r#"
            locations = ["Rabat", "Ifrane"]

            [database]
            path = "/tmp/weather.db"
            busy_timeout_ms = 250

            [weather]
            provider = "weatherapi"
            api_key = "file-key"
            timeout_secs = 3

            [orchestrator]
            max_concurrency = 4

            [logging]
            format = "json"
            "#,
        );

        let config = AppConfig::load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.locations, vec!["Rabat", "Ifrane"]);
        assert_eq!(config.database.path, "/tmp/weather.db");
        assert_eq!(config.database.busy_timeout_ms, 250);
        assert_eq!(config.database.connection_timeout_secs, 5);
        assert_eq!(config.weather.provider, ProviderKind::WeatherApi);
        assert_eq!(config.weather.api_key_str(), Some("file-key"));
        assert_eq!(config.weather.timeout_secs, 3);
        assert_eq!(config.orchestrator.max_concurrency, 4);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn prefixed_env_overrides_file() {
        let file = toml_file("[database]\npath = \"from-file.db\"\n");
        let config = AppConfig::load_with(
            Some(file.path()),
            env(&[
                ("CLIMATRACK_DATABASE__PATH", "from-env.db"),
                ("CLIMATRACK_LOCATIONS", "Agadir,Safi"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.path, "from-env.db");
        assert_eq!(config.locations, vec!["Agadir", "Safi"]);
    }

    #[test]
    fn legacy_variables_fill_gaps_only() {
        let config = AppConfig::load_with(
            None,
            env(&[
                ("WEATHER_API_KEY", "legacy-key"),
                ("WEATHER_API_PROVIDER", "weatherapi"),
            ]),
        )
        .unwrap();
        assert_eq!(config.weather.api_key_str(), Some("legacy-key"));
        assert_eq!(config.weather.provider, ProviderKind::WeatherApi);

        let file = toml_file("[weather]\napi_key = \"file-key\"\n");
        let config = AppConfig::load_with(
            Some(file.path()),
            env(&[("WEATHER_API_KEY", "legacy-key")]),
        )
        .unwrap();
        assert_eq!(
            config.weather.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("file-key".to_string())
        );
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = AppConfig::load_with(None, env(&[("WEATHER_API_PROVIDER", "darksky")]));
        assert!(result.is_err());
    }

    #[test]
    fn blank_api_key_means_no_credentials() {
        let config = AppConfig::load_with(None, env(&[("WEATHER_API_KEY", "  ")])).unwrap();
        assert!(!config.weather.has_credentials());
        assert!(config.weather.to_weather_config().is_none());
    }

    #[test]
    fn location_names_validate_and_dedup() {
        let config = AppConfig {
            locations: vec!["Rabat".into(), " Rabat ".into(), "Fès".into()],
            ..AppConfig::default()
        };
        let names = config.location_names().unwrap();
        let names: Vec<&str> = names.iter().map(LocationName::as_str).collect();
        assert_eq!(names, vec!["Rabat", "Fès"]);

        let config = AppConfig {
            locations: vec!["Rabat".into(), "   ".into()],
            ..AppConfig::default()
        };
        assert!(config.location_names().is_err());
    }

    #[test]
    fn weather_config_debug_redacts_key() {
        let config = AppConfig::load_with(None, env(&[("WEATHER_API_KEY", "s3cr3t")])).unwrap();
        let debug = format!("{:?}", config.weather);
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn provider_kind_parsing() {
        assert_eq!("openweather".parse::<ProviderKind>().unwrap(), ProviderKind::OpenWeather);
        assert_eq!("OpenWeatherMap".parse::<ProviderKind>().unwrap(), ProviderKind::OpenWeather);
        assert_eq!("weatherapi".parse::<ProviderKind>().unwrap(), ProviderKind::WeatherApi);
        assert!("metoffice".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::WeatherApi.to_string(), "weatherapi");
    }

    #[test]
    fn orchestrator_config_conversion_clamps_zero() {
        let section = OrchestratorAppConfig {
            max_concurrency: 0,
            refresh_interval_secs: 30,
        };
        assert_eq!(section.to_orchestrator_config().max_concurrency, 1);
    }

    #[test]
    fn in_memory_database_config() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
        assert!(config.run_migrations);
    }
}
