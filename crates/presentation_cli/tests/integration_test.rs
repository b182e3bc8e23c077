//! Integration tests for CLI
//!
//! Argument parsing, plus full command runs against a file-backed store.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::ffi::OsString;

use clap::Parser;
use infrastructure::{AppConfig, DatabaseConfig};
use presentation_cli::{App, Cli, Commands};

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_update_with_mock_and_locations() {
    let cli = parse_args(&["climatrack", "update", "--mock", "-l", "Rabat", "-l", "Fès"]).unwrap();
    if let Commands::Update { mock, locations } = cli.command {
        assert!(mock);
        let names: Vec<&str> = locations.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, vec!["Rabat", "Fès"]);
    } else {
        panic!("Expected Update command");
    }
}

#[test]
fn cli_rejects_blank_location() {
    assert!(parse_args(&["climatrack", "latest", "  "]).is_err());
}

#[test]
fn cli_parses_history_default_window() {
    let cli = parse_args(&["climatrack", "history", "Agadir"]).unwrap();
    if let Commands::History { location, hours } = cli.command {
        assert_eq!(location.as_str(), "Agadir");
        assert!((hours - 24.0).abs() < f64::EPSILON);
    } else {
        panic!("Expected History command");
    }
}

#[test]
fn cli_parses_fractional_hours() {
    let cli = parse_args(&["climatrack", "stats", "Agadir", "--hours", "0.5"]).unwrap();
    assert!(matches!(cli.command, Commands::Stats { hours, .. } if (hours - 0.5).abs() < f64::EPSILON));
}

#[test]
fn cli_parses_global_flags_after_subcommand() {
    let cli = parse_args(&["climatrack", "status", "-vv", "--json", "--config", "alt.toml"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert!(cli.json);
    assert_eq!(cli.config.unwrap().to_string_lossy(), "alt.toml");
}

#[test]
fn cli_parses_watch_options() {
    let cli = parse_args(&["climatrack", "watch", "--interval", "30", "--cycles", "3"]).unwrap();
    if let Commands::Watch {
        interval,
        mock,
        cycles,
    } = cli.command
    {
        assert_eq!(interval, Some(30));
        assert!(!mock);
        assert_eq!(cycles, Some(3));
    } else {
        panic!("Expected Watch command");
    }
}

#[test]
fn cli_parses_export_output() {
    let cli = parse_args(&["climatrack", "export", "Safi", "-o", "safi.csv"]).unwrap();
    assert!(matches!(cli.command, Commands::Export { output: Some(_), .. }));
}

#[test]
fn cli_requires_subcommand() {
    assert!(parse_args(&["climatrack"]).is_err());
}

#[tokio::test]
async fn commands_share_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database: DatabaseConfig {
            path: dir.path().join("climatrack.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        },
        locations: vec!["Casablanca".into(), "Marrakech".into()],
        ..AppConfig::default()
    };

    let app = App::open(config.clone(), false).unwrap();
    let mut out = Vec::new();
    let update = parse_args(&["climatrack", "update", "--mock"]).unwrap();
    app.run(update.command, &mut out).await.unwrap();
    drop(app);

    let app = App::open(config, false).unwrap();
    let mut out = Vec::new();
    let compare = parse_args(&["climatrack", "compare"]).unwrap();
    app.run(compare.command, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Casablanca  "));
    assert!(out.contains("Marrakech  "));
    assert!(out.contains("Hottest: "));
    assert!(!out.contains("No data"));
}
