//! Text rendering for command output

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use application::{
    ports::DatabaseHealth,
    services::{ComparisonHighlights, UpdateReport, WindowSummary},
};
use domain::{LocationName, WeatherRecord};

const MISSING: &str = "-";

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1}°C"))
}

fn kmh(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1} km/h"))
}

/// One observation on a single line
pub fn record_line(record: &WeatherRecord) -> String {
    let mut line = format!(
        "{}  {}  {}  humidity {}%  {} hPa  wind {}",
        record.location,
        record.timestamp.format("%Y-%m-%d %H:%M UTC"),
        celsius(record.temperature),
        or_missing(record.humidity),
        or_missing(record.pressure),
        kmh(record.wind_speed),
    );
    match (&record.condition, &record.description) {
        (Some(condition), Some(description)) if condition != description => {
            let _ = write!(line, "  {condition} ({description})");
        },
        (Some(text), _) | (None, Some(text)) => {
            let _ = write!(line, "  {text}");
        },
        (None, None) => {},
    }
    let _ = write!(line, "  [{}]", record.source);
    line
}

/// Observations of a window, oldest first
pub fn history(location: &LocationName, hours: f64, records: &[WeatherRecord]) -> String {
    let mut out = format!(
        "{location}: {} observation(s) in the last {hours}h\n",
        records.len()
    );
    for record in records {
        let _ = writeln!(out, "  {}", record_line(record));
    }
    out
}

/// Latest observation per location plus the extremes
pub fn comparison(latest: &BTreeMap<LocationName, WeatherRecord>, missing: &[LocationName]) -> String {
    let mut out = String::new();
    for record in latest.values() {
        let _ = writeln!(out, "{}", record_line(record));
    }
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(LocationName::as_str).collect();
        let _ = writeln!(out, "No data: {}", names.join(", "));
    }

    let highlights = ComparisonHighlights::from_latest(latest);
    let mut extreme = |label: &str, value: Option<(LocationName, f64)>, unit: &str| {
        if let Some((name, v)) = value {
            let _ = writeln!(out, "{label}: {name} ({v:.1}{unit})");
        }
    };
    extreme("Hottest", highlights.hottest, "°C");
    extreme("Coldest", highlights.coldest, "°C");
    extreme("Windiest", highlights.windiest, " km/h");
    out
}

/// Sorted list of locations
pub fn locations(names: &BTreeSet<LocationName>) -> String {
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "{name}");
    }
    out
}

/// Window aggregates
pub fn summary(location: &LocationName, hours: f64, summary: &WindowSummary) -> String {
    let mut out = format!("{location} over the last {hours}h\n");
    let _ = writeln!(out, "  samples:      {}", summary.samples);
    let _ = writeln!(
        out,
        "  from:         {}",
        summary.first.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "  to:           {}",
        summary.last.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "  max temp:     {}", celsius(summary.max_temperature));
    let _ = writeln!(out, "  min temp:     {}", celsius(summary.min_temperature));
    let _ = writeln!(out, "  mean temp:    {}", celsius(summary.mean_temperature));
    let _ = writeln!(out, "  peak wind:    {}", kmh(summary.peak_wind_speed));
    out
}

/// Per-location outcomes of a refresh batch and the totals
pub fn report(report: &UpdateReport) -> String {
    let mut out = String::new();
    for (location, outcome) in &report.outcomes {
        let marker = if outcome.is_stored() { "ok" } else { "!!" };
        let _ = writeln!(out, "{marker} {location}: {outcome}");
    }
    let _ = write!(
        out,
        "Stored {}/{} location(s)",
        report.stored_count(),
        report.outcomes.len()
    );
    if report.failed_count() > 0 {
        let _ = write!(out, ", {} failed", report.failed_count());
    }
    if report.cancelled_count() > 0 {
        let _ = write!(out, ", {} cancelled", report.cancelled_count());
    }
    out.push('\n');
    out
}

/// Store connectivity and provider mode
pub fn status(health: Option<&DatabaseHealth>, database: &str, provider: Option<&str>) -> String {
    let mut out = String::new();
    match health {
        Some(health) if health.reachable => {
            let _ = writeln!(out, "Store:     connected ({database})");
            if let Some(version) = &health.version {
                let _ = writeln!(out, "Engine:    {version}");
            }
            let _ = writeln!(out, "Records:   {}", or_missing(health.record_count));
            if let Some(ms) = health.response_time_ms {
                let _ = writeln!(out, "Latency:   {ms} ms");
            }
        },
        _ => {
            let _ = writeln!(out, "Store:     unreachable ({database})");
        },
    }
    let mode = provider.map_or_else(|| "synthetic (no provider key)".to_string(), str::to_string);
    let _ = writeln!(out, "Provider:  {mode}");
    out
}
