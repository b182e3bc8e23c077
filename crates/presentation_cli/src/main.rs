//! Climatrack CLI
//!
//! Collects weather observations and queries the stored history.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use infrastructure::{AppConfig, init_logging};
use presentation_cli::{App, Cli, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    init_logging(&config.logging)?;

    let app = App::open(config, cli.json)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(cli.command, &mut out).await?;
    out.flush()?;

    Ok(())
}
