//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::LocationName;

/// Weather observation tracker
#[derive(Debug, Parser)]
#[command(name = "climatrack")]
#[command(author, version, about = "Collect and query weather observations", long_about = None)]
pub struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./climatrack.toml when present)
    #[arg(short, long, env = "CLIMATRACK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch one observation per location and store it
    Update {
        /// Use synthetic data even when a provider is configured
        #[arg(long)]
        mock: bool,

        /// Locations to refresh (default: configured locations)
        #[arg(short, long = "location")]
        locations: Vec<LocationName>,
    },

    /// Refresh all configured locations periodically until interrupted
    Watch {
        /// Seconds between refreshes (default: orchestrator.refresh_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Use synthetic data even when a provider is configured
        #[arg(long)]
        mock: bool,

        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<u32>,
    },

    /// Show the most recent observation for a location
    Latest {
        location: LocationName,
    },

    /// Show observations within a trailing window
    History {
        location: LocationName,

        /// Window length in hours
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
    },

    /// Compare the latest observation across locations
    Compare {
        /// Locations to compare (default: configured locations)
        locations: Vec<LocationName>,
    },

    /// List every location with stored observations
    Locations,

    /// Aggregate figures for a location over a trailing window
    Stats {
        location: LocationName,

        /// Window length in hours
        #[arg(long, default_value_t = 24.0)]
        hours: f64,
    },

    /// Export a trailing window as CSV
    Export {
        location: LocationName,

        /// Window length in hours
        #[arg(long, default_value_t = 24.0)]
        hours: f64,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show store connectivity and provider mode
    Status,
}

/// Determine log filter level from verbosity count
///
/// `None` keeps the configured filter.
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
