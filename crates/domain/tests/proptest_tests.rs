//! Property-based tests for the weather record model
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::{LocationName, RecordDraft, RecordSource, WeatherRecord};
use proptest::prelude::*;

fn any_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01 .. 2040-01-01
    (946_684_800i64..2_208_988_800i64).prop_map(|secs| {
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or_else(Utc::now)
    })
}

// ============================================================================
// LocationName Property Tests
// ============================================================================

mod location_name_tests {
    use super::*;

    proptest! {
        #[test]
        fn non_blank_names_are_accepted_and_trimmed(
            name in "[A-Za-zÀ-ÿ][A-Za-zÀ-ÿ '-]{0,30}",
            pad_left in " {0,3}",
            pad_right in " {0,3}"
        ) {
            let padded = format!("{pad_left}{name}{pad_right}");
            let location = LocationName::new(&padded);
            prop_assert!(location.is_ok());
            let location = location.unwrap();
            prop_assert_eq!(location.as_str(), padded.trim());
        }

        #[test]
        fn whitespace_only_names_are_rejected(name in "[ \t\n]{0,10}") {
            prop_assert!(LocationName::new(&name).is_err());
        }
    }
}

// ============================================================================
// WeatherRecord Property Tests
// ============================================================================

mod weather_record_tests {
    use super::*;

    proptest! {
        #[test]
        fn draft_build_preserves_measurements(
            ts in any_timestamp(),
            temperature in -60.0f64..60.0,
            humidity in -20i32..200,
            pressure in 800i32..1100,
            wind in 0.0f64..250.0
        ) {
            let record = RecordDraft {
                location: Some("Marrakech".to_string()),
                timestamp: Some(ts),
                temperature: Some(temperature),
                humidity: Some(humidity),
                pressure: Some(pressure),
                wind_speed: Some(wind),
                ..Default::default()
            }
            .build();

            prop_assert!(record.is_ok());
            let record = record.unwrap();
            prop_assert_eq!(record.timestamp, ts);
            prop_assert_eq!(record.temperature, Some(temperature));
            prop_assert_eq!(record.humidity, Some(humidity));
            prop_assert_eq!(record.pressure, Some(pressure));
            prop_assert_eq!(record.wind_speed, Some(wind));
        }

        #[test]
        fn window_membership_matches_timestamp_bound(
            now in any_timestamp(),
            age_minutes in 0i64..10_000,
            window_minutes in 0i64..10_000
        ) {
            let location = LocationName::new("Agadir").unwrap();
            let record = WeatherRecord::new(location, now - Duration::minutes(age_minutes));
            let inside = record.is_within(Duration::minutes(window_minutes), now);
            prop_assert_eq!(inside, age_minutes <= window_minutes);
        }

        #[test]
        fn record_json_round_trip(
            ts in any_timestamp(),
            temperature in proptest::option::of((-600i32..600).prop_map(|tenths| f64::from(tenths) / 10.0)),
            synthetic in any::<bool>()
        ) {
            let source = if synthetic {
                RecordSource::Synthetic
            } else {
                RecordSource::provider("openweather")
            };
            let mut record = WeatherRecord::new(LocationName::new("Oujda").unwrap(), ts)
                .with_source(source);
            record.temperature = temperature;

            let json = serde_json::to_string(&record).unwrap();
            let back: WeatherRecord = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, record);
        }
    }
}
