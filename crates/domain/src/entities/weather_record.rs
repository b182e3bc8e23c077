//! Weather record entity - One timestamped observation for a location

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{LocationName, RecordId};

/// Where a record's values came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RecordSource {
    /// Fetched from a live weather provider (named)
    Provider(String),
    /// Generated locally from a per-location baseline
    Synthetic,
    /// Appended without provenance information
    #[default]
    Unspecified,
}

impl RecordSource {
    const PROVIDER_PREFIX: &'static str = "provider:";

    /// Shorthand for a live provider source
    #[must_use]
    pub fn provider(name: impl Into<String>) -> Self {
        Self::Provider(name.into())
    }

    /// Whether the values were synthesized rather than observed
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic)
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(name) => write!(f, "{}{name}", Self::PROVIDER_PREFIX),
            Self::Synthetic => f.write_str("synthetic"),
            Self::Unspecified => f.write_str("unspecified"),
        }
    }
}

impl std::str::FromStr for RecordSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "synthetic" => Ok(Self::Synthetic),
            "unspecified" | "" => Ok(Self::Unspecified),
            other => other
                .strip_prefix(Self::PROVIDER_PREFIX)
                .filter(|name| !name.is_empty())
                .map(Self::provider)
                .ok_or_else(|| DomainError::invalid_stored("source", other)),
        }
    }
}

impl From<RecordSource> for String {
    fn from(source: RecordSource) -> Self {
        source.to_string()
    }
}

impl TryFrom<String> for RecordSource {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One weather observation
///
/// `location` and `timestamp` are always present. Measurement fields are
/// optional: the store keeps whatever the producer supplied. Units are
/// canonical (Celsius, %, hPa, km/h) by the time a record exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Storage-assigned identifier, present only on records read back from a store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Tracked location
    pub location: LocationName,
    /// Observation time, the ordering key within a location
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity percentage (expected 0-100, not enforced)
    #[serde(default)]
    pub humidity: Option<i32>,
    /// Pressure in hPa
    #[serde(default)]
    pub pressure: Option<i32>,
    /// Wind speed in km/h
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// Short provider-specific category label
    #[serde(default)]
    pub condition: Option<String>,
    /// Free-text detail
    #[serde(default)]
    pub description: Option<String>,
    /// Provider icon code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Provenance of the values
    #[serde(default)]
    pub source: RecordSource,
}

impl WeatherRecord {
    /// Create a record with no measurements
    #[must_use]
    pub fn new(location: LocationName, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            location,
            timestamp,
            temperature: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
            condition: None,
            description: None,
            icon: None,
            source: RecordSource::Unspecified,
        }
    }

    /// Create a record stamped with the current time
    #[must_use]
    pub fn now(location: LocationName) -> Self {
        Self::new(location, Utc::now())
    }

    #[must_use]
    pub const fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    #[must_use]
    pub const fn with_humidity(mut self, percent: i32) -> Self {
        self.humidity = Some(percent);
        self
    }

    #[must_use]
    pub const fn with_pressure(mut self, hpa: i32) -> Self {
        self.pressure = Some(hpa);
        self
    }

    #[must_use]
    pub const fn with_wind_speed(mut self, kmh: f64) -> Self {
        self.wind_speed = Some(kmh);
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: RecordSource) -> Self {
        self.source = source;
        self
    }

    /// Attach the identifier a store assigned on append
    #[must_use]
    pub const fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check the identifying fields before the record is handed to a store
    ///
    /// `LocationName` already rejects blank names on construction and
    /// deserialization; this guards records assembled field by field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.location.as_str().trim().is_empty() {
            return Err(DomainError::Validation("location is required".to_string()));
        }
        Ok(())
    }

    /// Whether the record falls inside the trailing window ending at `now`
    ///
    /// A window reaching past the earliest representable instant covers everything.
    #[must_use]
    pub fn is_within(&self, window: chrono::Duration, now: DateTime<Utc>) -> bool {
        now.checked_sub_signed(window)
            .is_none_or(|cutoff| self.timestamp >= cutoff)
    }

    /// Row for the tabular export surface
    #[must_use]
    pub fn to_export_row(&self) -> ExportRow {
        ExportRow::from(self)
    }
}

/// A loosely-typed observation as a producer hands it over
///
/// Mirrors the untyped payloads providers return. `build` enforces the
/// identifying fields and stamps a timestamp when none was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<i32>,
    #[serde(default)]
    pub pressure: Option<i32>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub source: RecordSource,
}

impl RecordDraft {
    /// Turn the draft into a record
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the location is missing or blank.
    pub fn build(self) -> Result<WeatherRecord, DomainError> {
        let location = self
            .location
            .as_deref()
            .ok_or_else(|| DomainError::Validation("location is required".to_string()))
            .and_then(|raw| {
                LocationName::new(raw)
                    .map_err(|_| DomainError::Validation("location must not be blank".to_string()))
            })?;

        Ok(WeatherRecord {
            id: None,
            location,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            temperature: self.temperature,
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.wind_speed,
            condition: self.condition,
            description: self.description,
            icon: self.icon,
            source: self.source,
        })
    }
}

/// Export row, columns in the fixed order
/// `timestamp, location, temperature, humidity, pressure, wind_speed, condition, description`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub timestamp: String,
    pub location: String,
    pub temperature: Option<f64>,
    pub humidity: Option<i32>,
    pub pressure: Option<i32>,
    pub wind_speed: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
}

impl ExportRow {
    /// Column names in export order
    pub const COLUMNS: [&'static str; 8] = [
        "timestamp",
        "location",
        "temperature",
        "humidity",
        "pressure",
        "wind_speed",
        "condition",
        "description",
    ];
}

impl From<&WeatherRecord> for ExportRow {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            timestamp: record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            location: record.location.to_string(),
            temperature: record.temperature,
            humidity: record.humidity,
            pressure: record.pressure,
            wind_speed: record.wind_speed,
            condition: record.condition.clone(),
            description: record.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn casablanca() -> LocationName {
        LocationName::new("Casablanca").unwrap()
    }

    #[test]
    fn builder_sets_fields() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = WeatherRecord::new(casablanca(), ts)
            .with_temperature(18.0)
            .with_humidity(65)
            .with_pressure(1013)
            .with_wind_speed(14.4)
            .with_condition("Clear")
            .with_description("ciel dégagé")
            .with_icon("01d")
            .with_source(RecordSource::provider("openweather"));

        assert_eq!(record.location.as_str(), "Casablanca");
        assert_eq!(record.timestamp, ts);
        assert_eq!(record.humidity, Some(65));
        assert_eq!(record.pressure, Some(1013));
        assert_eq!(record.condition.as_deref(), Some("Clear"));
        assert_eq!(record.icon.as_deref(), Some("01d"));
        assert!(record.id.is_none());
        assert!(!record.source.is_synthetic());
    }

    #[test]
    fn draft_without_location_is_rejected() {
        let draft = RecordDraft {
            temperature: Some(20.0),
            ..Default::default()
        };
        assert!(matches!(draft.build(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn draft_with_blank_location_is_rejected() {
        let draft = RecordDraft {
            location: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(draft.build(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn draft_without_timestamp_is_stamped_now() {
        let before = Utc::now();
        let record = RecordDraft {
            location: Some("Rabat".to_string()),
            ..Default::default()
        }
        .build()
        .unwrap();
        let after = Utc::now();

        assert!(record.timestamp >= before && record.timestamp <= after);
    }

    #[test]
    fn draft_keeps_supplied_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let record = RecordDraft {
            location: Some("Fès".to_string()),
            timestamp: Some(ts),
            humidity: Some(140),
            ..Default::default()
        }
        .build()
        .unwrap();

        assert_eq!(record.timestamp, ts);
        // out-of-range humidity is kept as supplied
        assert_eq!(record.humidity, Some(140));
    }

    #[test]
    fn source_string_round_trip() {
        for source in [
            RecordSource::Synthetic,
            RecordSource::Unspecified,
            RecordSource::provider("weatherapi"),
        ] {
            let parsed: RecordSource = source.to_string().parse().unwrap();
            assert_eq!(parsed, source);
        }
        assert!("provider:".parse::<RecordSource>().is_err());
        assert!("satellite".parse::<RecordSource>().is_err());
    }

    #[test]
    fn window_membership_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let edge = WeatherRecord::new(casablanca(), now - Duration::hours(2));
        let older = WeatherRecord::new(casablanca(), now - Duration::hours(3));

        assert!(edge.is_within(Duration::hours(2), now));
        assert!(!older.is_within(Duration::hours(2), now));
    }

    #[test]
    fn unbounded_window_contains_everything() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ancient = WeatherRecord::new(casablanca(), DateTime::<Utc>::MIN_UTC);

        assert!(ancient.is_within(Duration::MAX, now));
        assert!(!ancient.is_within(Duration::days(1), now));
    }

    #[test]
    fn export_row_uses_fixed_columns() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = WeatherRecord::new(casablanca(), ts)
            .with_temperature(17.2)
            .with_icon("01d");
        let row = record.to_export_row();

        assert_eq!(row.timestamp, "2026-03-01T12:00:00Z");
        assert_eq!(row.location, "Casablanca");
        assert_eq!(row.temperature, Some(17.2));

        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for column in ExportRow::COLUMNS {
            assert!(keys.contains(&column), "missing column {column}");
        }
        assert_eq!(keys.len(), ExportRow::COLUMNS.len());
    }

    #[test]
    fn record_json_round_trip_keeps_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = WeatherRecord::new(casablanca(), ts)
            .with_temperature(19.5)
            .with_source(RecordSource::Synthetic);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location"], "Casablanca");
        assert_eq!(json["source"], "synthetic");
        assert!(json.get("id").is_none());

        let back: WeatherRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn deserializing_blank_location_fails() {
        let json = serde_json::json!({
            "location": "",
            "timestamp": "2026-03-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<WeatherRecord>(json).is_err());
    }
}
