//! Command handlers
//!
//! Each handler reads through the query facade or drives the orchestrator and
//! writes its result to the given output.

use std::{collections::BTreeMap, io::Write, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, bail};
use application::{
    ports::{DatabaseHealthPort, ObservationStorePort},
    services::{Lookup, ObservationQueryService, UpdateOrchestrator, UpdateReport, window_from_hours},
};
use chrono::Utc;
use domain::{LocationName, WeatherRecord};
use infrastructure::{
    AppConfig, SqliteDatabaseHealth, SqliteObservationStore, SyntheticWeatherGenerator,
    build_fetcher, create_pool, write_csv,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{cli::Commands, render};

/// Wired services for one CLI invocation
pub struct App {
    config: AppConfig,
    store: Arc<dyn ObservationStorePort>,
    health: SqliteDatabaseHealth,
    query: ObservationQueryService,
    json: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("database", &self.config.database.path)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Open the store described by `config`
    pub fn open(config: AppConfig, json: bool) -> anyhow::Result<Self> {
        let pool = Arc::new(
            create_pool(&config.database)
                .with_context(|| format!("failed to open database {}", config.database.path))?,
        );
        let store: Arc<dyn ObservationStorePort> =
            Arc::new(SqliteObservationStore::new(Arc::clone(&pool)));

        Ok(Self {
            query: ObservationQueryService::new(Arc::clone(&store)),
            health: SqliteDatabaseHealth::new(pool),
            store,
            config,
            json,
        })
    }

    fn orchestrator(&self) -> anyhow::Result<UpdateOrchestrator> {
        let orchestrator = UpdateOrchestrator::new(
            Arc::clone(&self.store),
            Arc::new(SyntheticWeatherGenerator::new()),
            self.config.orchestrator.to_orchestrator_config(),
        );
        Ok(match build_fetcher(&self.config.weather)? {
            Some(fetcher) => orchestrator.with_fetcher(fetcher),
            None => orchestrator,
        })
    }

    fn configured_locations(&self) -> anyhow::Result<Vec<LocationName>> {
        self.config
            .location_names()
            .context("invalid locations in configuration")
    }

    /// Execute one command
    pub async fn run(&self, command: Commands, out: &mut dyn Write) -> anyhow::Result<()> {
        match command {
            Commands::Update { mock, locations } => self.update(mock, locations, out).await,
            Commands::Watch {
                interval,
                mock,
                cycles,
            } => self.watch(interval, mock, cycles, out).await,
            Commands::Latest { location } => self.latest(&location, out).await,
            Commands::History { location, hours } => self.history(&location, hours, out).await,
            Commands::Compare { locations } => self.compare(locations, out).await,
            Commands::Locations => self.locations(out).await,
            Commands::Stats { location, hours } => self.stats(&location, hours, out).await,
            Commands::Export {
                location,
                hours,
                output,
            } => self.export(&location, hours, output, out).await,
            Commands::Status => self.status(out).await,
        }
    }

    async fn update(
        &self,
        mock: bool,
        locations: Vec<LocationName>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let locations = if locations.is_empty() {
            self.configured_locations()?
        } else {
            locations
        };

        let report = self.orchestrator()?.update_all(&locations, mock).await;
        self.write_report(&report, out)
    }

    async fn watch(
        &self,
        interval: Option<u64>,
        mock: bool,
        cycles: Option<u32>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let orchestrator = self.orchestrator()?;
        let locations = self.configured_locations()?;
        let period = Duration::from_secs(
            interval
                .unwrap_or(self.config.orchestrator.refresh_interval_secs)
                .max(1),
        );

        let (cancel_tx, cancel_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping after the current location");
                let _ = cancel_tx.send(true);
            }
        });

        info!(
            locations = locations.len(),
            interval_secs = period.as_secs(),
            "Watching"
        );

        self.watch_until(&orchestrator, &locations, period, mock, cycles, cancel_rx, out)
            .await
    }

    /// Refresh every `period` until cancelled or `cycles` batches have run
    ///
    /// A closed cancel channel means interrupts are unavailable; ticking continues.
    #[allow(clippy::too_many_arguments)]
    async fn watch_until(
        &self,
        orchestrator: &UpdateOrchestrator,
        locations: &[LocationName],
        period: Duration,
        mock: bool,
        cycles: Option<u32>,
        cancel_rx: watch::Receiver<bool>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(period);
        let mut stop = cancel_rx.clone();
        let mut signals_open = true;
        let mut completed = 0_u32;

        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                changed = stop.changed(), if signals_open => {
                    if changed.is_ok() {
                        break;
                    }
                    debug!("Interrupt handler unavailable, watching without it");
                    signals_open = false;
                    continue;
                },
            }
            if *cancel_rx.borrow() {
                break;
            }

            let report = orchestrator
                .update_all_until(locations, mock, cancel_rx.clone())
                .await;
            self.write_report(&report, out)?;

            completed += 1;
            if cycles.is_some_and(|max| completed >= max) {
                break;
            }
        }

        info!(cycles = completed, "Watch stopped");
        Ok(())
    }

    async fn latest(&self, location: &LocationName, out: &mut dyn Write) -> anyhow::Result<()> {
        match self.query.current(location).await {
            Lookup::Found(record) => {
                if self.json {
                    write_json(out, &record)
                } else {
                    writeln!(out, "{}", render::record_line(&record))?;
                    Ok(())
                }
            },
            Lookup::Empty => no_data(out, location),
            Lookup::Unavailable(reason) => store_unavailable(&reason),
        }
    }

    async fn history(
        &self,
        location: &LocationName,
        hours: f64,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let window = window_from_hours(hours)?;
        match self.query.history_at(location, window, Utc::now()).await {
            Lookup::Found(records) => {
                if self.json {
                    write_json(out, &records)
                } else {
                    write!(out, "{}", render::history(location, hours, &records))?;
                    Ok(())
                }
            },
            Lookup::Empty => {
                if self.json {
                    write_json(out, &Vec::<WeatherRecord>::new())
                } else {
                    writeln!(out, "{location}: no observations in the last {hours}h")?;
                    Ok(())
                }
            },
            Lookup::Unavailable(reason) => store_unavailable(&reason),
        }
    }

    async fn compare(
        &self,
        locations: Vec<LocationName>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let locations = if locations.is_empty() {
            self.configured_locations()?
        } else {
            locations
        };

        let latest = match self.query.compare(&locations).await {
            Lookup::Found(latest) => latest,
            Lookup::Empty => BTreeMap::new(),
            Lookup::Unavailable(reason) => return store_unavailable(&reason),
        };

        if self.json {
            return write_json(out, &latest);
        }
        let missing: Vec<LocationName> = locations
            .into_iter()
            .filter(|name| !latest.contains_key(name))
            .collect();
        write!(out, "{}", render::comparison(&latest, &missing))?;
        Ok(())
    }

    async fn locations(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        match self.query.locations().await {
            Lookup::Found(names) => {
                if self.json {
                    write_json(out, &names)
                } else {
                    write!(out, "{}", render::locations(&names))?;
                    Ok(())
                }
            },
            Lookup::Empty => {
                if self.json {
                    write_json(out, &Vec::<LocationName>::new())
                } else {
                    writeln!(out, "No observations stored yet")?;
                    Ok(())
                }
            },
            Lookup::Unavailable(reason) => store_unavailable(&reason),
        }
    }

    async fn stats(
        &self,
        location: &LocationName,
        hours: f64,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let window = window_from_hours(hours)?;
        match self.query.summary_at(location, window, Utc::now()).await {
            Lookup::Found(summary) => {
                if self.json {
                    write_json(out, &summary)
                } else {
                    write!(out, "{}", render::summary(location, hours, &summary))?;
                    Ok(())
                }
            },
            Lookup::Empty => no_data(out, location),
            Lookup::Unavailable(reason) => store_unavailable(&reason),
        }
    }

    async fn export(
        &self,
        location: &LocationName,
        hours: f64,
        output: Option<PathBuf>,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let window = window_from_hours(hours)?;
        let rows = match self.query.export_rows_at(location, window, Utc::now()).await {
            Lookup::Found(rows) => rows,
            Lookup::Empty => Vec::new(),
            Lookup::Unavailable(reason) => return store_unavailable(&reason),
        };

        match output {
            Some(path) => {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                write_csv(&rows, file)?;
                info!(rows = rows.len(), path = %path.display(), "Exported observations");
                writeln!(out, "Wrote {} row(s) to {}", rows.len(), path.display())?;
            },
            None => write_csv(&rows, &mut *out)?,
        }
        Ok(())
    }

    async fn status(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let health = match self.health.check_health().await {
            Ok(health) => Some(health),
            Err(e) => {
                warn!(error = %e, "Store health check failed");
                None
            },
        };
        let provider = self
            .config
            .weather
            .has_credentials()
            .then(|| self.config.weather.provider.to_string());

        if self.json {
            return write_json(
                out,
                &serde_json::json!({
                    "store": health,
                    "database": self.config.database.path,
                    "provider": provider,
                    "locations": self.config.locations.len(),
                }),
            );
        }
        write!(
            out,
            "{}",
            render::status(
                health.as_ref(),
                &self.config.database.path,
                provider.as_deref()
            )
        )?;
        writeln!(out, "Locations: {}", self.config.locations.len())?;
        Ok(())
    }

    fn write_report(&self, report: &UpdateReport, out: &mut dyn Write) -> anyhow::Result<()> {
        if self.json {
            let outcomes: Vec<serde_json::Value> = report
                .outcomes
                .iter()
                .map(|(location, outcome)| {
                    serde_json::json!({
                        "location": location,
                        "stored": outcome.is_stored(),
                        "outcome": outcome.to_string(),
                    })
                })
                .collect();
            return write_json(out, &outcomes);
        }
        write!(out, "{}", render::report(report))?;
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn no_data(out: &mut dyn Write, location: &LocationName) -> anyhow::Result<()> {
    writeln!(out, "No data for {location}")?;
    Ok(())
}

fn store_unavailable(reason: &str) -> anyhow::Result<()> {
    bail!("observation store unavailable: {reason}")
}
