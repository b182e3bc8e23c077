//! Update orchestrator
//!
//! Refreshes a batch of locations: one observation per location, taken from the
//! live provider when one is configured and falling back to synthetic data
//! otherwise, appended to the observation store.
//!
//! The batch is best effort, not a transaction. Every location is handled in
//! isolation and a failure is logged and recorded in the report, never
//! propagated.

use std::{fmt, sync::Arc};

use domain::{LocationName, WeatherRecord};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{ObservationStorePort, SyntheticWeatherPort, WeatherFetcherPort};

/// Configuration for the update orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Locations processed at the same time (default: 1, strictly sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

const fn default_max_concurrency() -> usize {
    1
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// What happened to one location during a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationOutcome {
    /// Live observation fetched and stored
    Fetched { provider: &'static str },
    /// Synthetic observation stored (offline mode or no provider configured)
    Synthetic,
    /// Provider failed; synthetic observation stored instead
    FallbackSynthetic { reason: String },
    /// Record failed validation and never reached the store
    Rejected { reason: String },
    /// Observation could not be stored
    StoreFailed { reason: String },
    /// Batch was cancelled before this location started
    Cancelled,
}

impl LocationOutcome {
    /// Whether a new record was appended for the location
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        matches!(
            self,
            Self::Fetched { .. } | Self::Synthetic | Self::FallbackSynthetic { .. }
        )
    }
}

impl fmt::Display for LocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched { provider } => write!(f, "fetched from {provider}"),
            Self::Synthetic => f.write_str("synthetic"),
            Self::FallbackSynthetic { reason } => write!(f, "synthetic fallback ({reason})"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::StoreFailed { reason } => write!(f, "store failed: {reason}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Per-location results of one batch, in input order
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub outcomes: Vec<(LocationName, LocationOutcome)>,
}

impl UpdateReport {
    /// Number of locations that received a new record
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_stored()).count()
    }

    /// Number of locations whose record was rejected or could not be stored
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| {
                matches!(
                    o,
                    LocationOutcome::StoreFailed { .. } | LocationOutcome::Rejected { .. }
                )
            })
            .count()
    }

    /// Number of locations skipped because of cancellation
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, LocationOutcome::Cancelled))
            .count()
    }

    /// Outcome for a given location, if it was part of the batch
    #[must_use]
    pub fn outcome_for(&self, location: &LocationName) -> Option<&LocationOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == location)
            .map(|(_, outcome)| outcome)
    }
}

/// Drives batch refreshes of location observations
pub struct UpdateOrchestrator {
    store: Arc<dyn ObservationStorePort>,
    fetcher: Option<Arc<dyn WeatherFetcherPort>>,
    synthetic: Arc<dyn SyntheticWeatherPort>,
    config: OrchestratorConfig,
}

impl fmt::Debug for UpdateOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateOrchestrator")
            .field(
                "fetcher",
                &self.fetcher.as_ref().map(|fetcher| fetcher.provider_name()),
            )
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UpdateOrchestrator {
    /// Create an orchestrator without a live provider
    ///
    /// Until a fetcher is attached every location receives synthetic data.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObservationStorePort>,
        synthetic: Arc<dyn SyntheticWeatherPort>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            fetcher: None,
            synthetic,
            config,
        }
    }

    /// Attach the live weather provider
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn WeatherFetcherPort>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Whether a live provider is configured
    #[must_use]
    pub fn has_fetcher(&self) -> bool {
        self.fetcher.is_some()
    }

    /// Refresh every location once
    ///
    /// With `use_mock` the live provider is skipped entirely.
    pub async fn update_all(&self, locations: &[LocationName], use_mock: bool) -> UpdateReport {
        let (_keep_open, never_cancelled) = watch::channel(false);
        self.update_all_until(locations, use_mock, never_cancelled)
            .await
    }

    /// Refresh every location once, stopping early when `cancel` turns `true`
    ///
    /// Cancellation is checked before each location starts; a location already
    /// in progress finishes its single append.
    #[instrument(skip(self, locations, cancel), fields(count = locations.len()))]
    pub async fn update_all_until(
        &self,
        locations: &[LocationName],
        use_mock: bool,
        cancel: watch::Receiver<bool>,
    ) -> UpdateReport {
        let concurrency = self.config.max_concurrency.max(1);
        info!(use_mock, concurrency, "Starting weather update batch");

        let cancel = &cancel;
        let outcomes: Vec<(LocationName, LocationOutcome)> = stream::iter(locations)
            .map(|location| async move {
                let cancelled = *cancel.borrow();
                if cancelled {
                    debug!(location = %location, "Batch cancelled, skipping location");
                    return (location.clone(), LocationOutcome::Cancelled);
                }
                (location.clone(), self.update_one(location, use_mock).await)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let report = UpdateReport { outcomes };
        info!(
            stored = report.stored_count(),
            failed = report.failed_count(),
            cancelled = report.cancelled_count(),
            "Weather update batch finished"
        );
        report
    }

    async fn update_one(&self, location: &LocationName, use_mock: bool) -> LocationOutcome {
        let (record, outcome) = self.obtain_record(location, use_mock).await;

        if let Err(e) = record.validate() {
            warn!(location = %location, error = %e, "Rejected invalid observation");
            return LocationOutcome::Rejected {
                reason: e.to_string(),
            };
        }

        match self.store.append(&record).await {
            Ok(id) => {
                debug!(location = %location, record_id = %id, "Stored observation");
                outcome
            },
            Err(e) => {
                error!(location = %location, error = %e, "Failed to store observation");
                LocationOutcome::StoreFailed {
                    reason: e.to_string(),
                }
            },
        }
    }

    async fn obtain_record(
        &self,
        location: &LocationName,
        use_mock: bool,
    ) -> (WeatherRecord, LocationOutcome) {
        let fetcher = match &self.fetcher {
            Some(fetcher) if !use_mock => fetcher,
            Some(_) => {
                info!(location = %location, "Offline mode, generating synthetic observation");
                return (self.synthetic.generate(location), LocationOutcome::Synthetic);
            },
            None => {
                info!(location = %location, "No provider configured, generating synthetic observation");
                return (self.synthetic.generate(location), LocationOutcome::Synthetic);
            },
        };

        match fetcher.fetch(location).await {
            Ok(record) => {
                info!(
                    location = %location,
                    provider = fetcher.provider_name(),
                    temperature = ?record.temperature,
                    "Fetched observation"
                );
                (
                    record,
                    LocationOutcome::Fetched {
                        provider: fetcher.provider_name(),
                    },
                )
            },
            Err(e) => {
                warn!(
                    location = %location,
                    provider = fetcher.provider_name(),
                    error = %e,
                    "Fetch failed, falling back to synthetic observation"
                );
                (
                    self.synthetic.generate(location),
                    LocationOutcome::FallbackSynthetic {
                        reason: e.to_string(),
                    },
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use domain::{RecordId, RecordSource};

    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::{MockObservationStorePort, MockSyntheticWeatherPort, MockWeatherFetcherPort};

    fn loc(name: &str) -> LocationName {
        LocationName::new(name).unwrap()
    }

    fn synthetic_mock() -> MockSyntheticWeatherPort {
        let mut mock = MockSyntheticWeatherPort::new();
        mock.expect_generate().returning(|location| {
            WeatherRecord::now(location.clone())
                .with_temperature(20.0)
                .with_source(RecordSource::Synthetic)
        });
        mock
    }

    fn accepting_store() -> MockObservationStorePort {
        let next_id = AtomicI64::new(1);
        let mut mock = MockObservationStorePort::new();
        mock.expect_append()
            .returning(move |_| Ok(RecordId::new(next_id.fetch_add(1, Ordering::SeqCst))));
        mock
    }

    fn orchestrator(
        store: MockObservationStorePort,
        synthetic: MockSyntheticWeatherPort,
    ) -> UpdateOrchestrator {
        UpdateOrchestrator::new(
            Arc::new(store),
            Arc::new(synthetic),
            OrchestratorConfig::default(),
        )
    }

    #[tokio::test]
    async fn mock_mode_always_stores_one_synthetic_record() {
        let mut store = MockObservationStorePort::new();
        store
            .expect_append()
            .withf(|record| record.location.as_str() == "Casablanca" && record.source.is_synthetic())
            .times(1)
            .returning(|_| Ok(RecordId::new(1)));

        let mut fetcher = MockWeatherFetcherPort::new();
        fetcher.expect_fetch().never();
        fetcher.expect_provider_name().return_const("mock");

        let service = orchestrator(store, synthetic_mock()).with_fetcher(Arc::new(fetcher));
        let report = service.update_all(&[loc("Casablanca")], true).await;

        assert_eq!(report.stored_count(), 1);
        assert_eq!(
            report.outcome_for(&loc("Casablanca")),
            Some(&LocationOutcome::Synthetic)
        );
    }

    #[tokio::test]
    async fn missing_provider_falls_back_to_synthetic() {
        let service = orchestrator(accepting_store(), synthetic_mock());
        assert!(!service.has_fetcher());

        let report = service.update_all(&[loc("Rabat"), loc("Fès")], false).await;

        assert_eq!(report.stored_count(), 2);
        assert!(
            report
                .outcomes
                .iter()
                .all(|(_, outcome)| *outcome == LocationOutcome::Synthetic)
        );
    }

    #[tokio::test]
    async fn failed_fetch_for_one_location_does_not_affect_another() {
        let mut fetcher = MockWeatherFetcherPort::new();
        fetcher.expect_provider_name().return_const("mock");
        fetcher.expect_fetch().returning(|location| {
            if location.as_str() == "Agadir" {
                Err(ApplicationError::FetchFailed("timed out".into()))
            } else {
                Ok(WeatherRecord::now(location.clone())
                    .with_temperature(24.0)
                    .with_source(RecordSource::provider("mock")))
            }
        });

        let mut store = MockObservationStorePort::new();
        store
            .expect_append()
            .withf(|r| r.location.as_str() == "Agadir" && r.source.is_synthetic())
            .times(1)
            .returning(|_| Ok(RecordId::new(1)));
        store
            .expect_append()
            .withf(|r| r.location.as_str() == "Tanger" && !r.source.is_synthetic())
            .times(1)
            .returning(|_| Ok(RecordId::new(2)));

        let service = orchestrator(store, synthetic_mock()).with_fetcher(Arc::new(fetcher));
        let report = service.update_all(&[loc("Agadir"), loc("Tanger")], false).await;

        assert_eq!(report.stored_count(), 2);
        assert!(matches!(
            report.outcome_for(&loc("Agadir")),
            Some(LocationOutcome::FallbackSynthetic { reason }) if reason.contains("timed out")
        ));
        assert_eq!(
            report.outcome_for(&loc("Tanger")),
            Some(&LocationOutcome::Fetched { provider: "mock" })
        );
    }

    #[tokio::test]
    async fn store_failure_is_contained_to_its_location() {
        let mut store = MockObservationStorePort::new();
        store
            .expect_append()
            .withf(|r| r.location.as_str() == "Oujda")
            .times(1)
            .returning(|_| Err(ApplicationError::StorageUnavailable("disk full".into())));
        store
            .expect_append()
            .withf(|r| r.location.as_str() == "Nador")
            .times(1)
            .returning(|_| Ok(RecordId::new(7)));

        let service = orchestrator(store, synthetic_mock());
        let report = service.update_all(&[loc("Oujda"), loc("Nador")], true).await;

        assert_eq!(report.stored_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            report.outcome_for(&loc("Oujda")),
            Some(LocationOutcome::StoreFailed { .. })
        ));
        assert!(report.outcome_for(&loc("Nador")).is_some_and(LocationOutcome::is_stored));
    }

    #[tokio::test]
    async fn cancelled_batch_appends_nothing() {
        let mut store = MockObservationStorePort::new();
        store.expect_append().never();

        let service = orchestrator(store, synthetic_mock());
        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();

        let report = service
            .update_all_until(&[loc("Safi"), loc("Taza")], true, cancel_rx)
            .await;

        assert_eq!(report.cancelled_count(), 2);
        assert_eq!(report.stored_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_batch_keeps_input_order_in_report() {
        let service = UpdateOrchestrator::new(
            Arc::new(accepting_store()),
            Arc::new(synthetic_mock()),
            OrchestratorConfig { max_concurrency: 4 },
        );
        let names = ["Ifrane", "Settat", "Dakhla", "Guelmim", "Tan-Tan", "Asilah"];
        let locations: Vec<LocationName> = names.iter().map(|n| loc(n)).collect();

        let report = service.update_all(&locations, true).await;

        let reported: Vec<&str> = report.outcomes.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(reported, names);
        assert_eq!(report.stored_count(), names.len());
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let mut store = MockObservationStorePort::new();
        store.expect_append().never();

        let service = orchestrator(store, synthetic_mock());
        let report = service.update_all(&[], false).await;

        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn config_defaults_to_sequential() {
        assert_eq!(OrchestratorConfig::default().max_concurrency, 1);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            LocationOutcome::Fetched { provider: "openweather" }.to_string(),
            "fetched from openweather"
        );
        assert_eq!(
            LocationOutcome::FallbackSynthetic {
                reason: "timeout".into()
            }
            .to_string(),
            "synthetic fallback (timeout)"
        );
        assert_eq!(LocationOutcome::Cancelled.to_string(), "cancelled");
    }
}
