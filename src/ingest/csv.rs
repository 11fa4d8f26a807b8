//! CSV decoding for the smart-home sensor dataset.
//!
//! The source data is messy: numeric cells may hold garbage, timestamps come
//! in a handful of formats, and the optional energy/light columns are absent
//! from some exports. Decoding is therefore lenient per cell (bad numbers
//! become `None`) and strict per file (required headers must exist). Rows
//! whose timestamp cannot be parsed are dropped and counted.

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::IngestError;
use crate::domain::{MotionState, SensorReading};

/// Headers that must be present for a file to be accepted.
const REQUIRED_COLUMNS: [&str; 6] = [
    "Home_ID",
    "DateTime",
    "Room",
    "Temperature_C",
    "Humidity_%",
    "Motion_Sensor",
];

/// Timestamp formats observed in dataset exports, tried in order.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug)]
pub struct ParsedDataset {
    /// Readings sorted ascending by timestamp.
    pub readings: Vec<SensorReading>,
    /// Rows dropped during decoding: malformed records or unparseable
    /// timestamps.
    pub skipped_rows: usize,
}

/// One raw CSV row. Every cell is decoded leniently; requiredness is
/// enforced on the header row, not per cell.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Home_ID", default)]
    home_id: String,
    #[serde(rename = "DateTime", default)]
    datetime: String,
    #[serde(rename = "Room", default)]
    room: String,
    #[serde(rename = "Temperature_C", default, deserialize_with = "lenient_f64")]
    temperature_c: Option<f64>,
    #[serde(rename = "Humidity_%", default, deserialize_with = "lenient_f64")]
    humidity_pct: Option<f64>,
    #[serde(rename = "Light_Lux", default, deserialize_with = "lenient_f64")]
    light_lux: Option<f64>,
    #[serde(rename = "Motion_Sensor", default, deserialize_with = "lenient_motion")]
    motion: MotionState,
    #[serde(rename = "Appliance_Usage_kWh", default, deserialize_with = "lenient_f64")]
    appliance_kwh: Option<f64>,
    #[serde(rename = "HVAC_Usage_kWh", default, deserialize_with = "lenient_f64")]
    hvac_kwh: Option<f64>,
    #[serde(rename = "Water_Heater_kWh", default, deserialize_with = "lenient_f64")]
    water_heater_kwh: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok().filter(|v| v.is_finite())))
}

fn lenient_motion<'de, D>(deserializer: D) -> Result<MotionState, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.trim().parse::<MotionState>().ok())
        .unwrap_or_default())
}

fn parse_timestamp(raw: &str) -> Option<chrono::NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Decode a CSV document into sorted readings.
///
/// Returns `IngestError::MissingColumn` if a required header is absent and
/// `IngestError::Empty` if no row survives decoding.
pub fn parse_csv(data: &[u8]) -> Result<ParsedDataset, IngestError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::Empty);
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(IngestError::MissingColumn(required));
        }
    }

    let mut readings = Vec::new();
    let mut skipped_rows = 0usize;

    for record in reader.deserialize::<RawRecord>() {
        let raw = match record {
            Ok(raw) => raw,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };
        let Some(timestamp) = parse_timestamp(&raw.datetime) else {
            skipped_rows += 1;
            continue;
        };
        readings.push(SensorReading {
            home_id: raw.home_id,
            timestamp,
            room: raw.room,
            temperature_c: raw.temperature_c,
            humidity_pct: raw.humidity_pct,
            light_lux: raw.light_lux,
            motion: raw.motion,
            appliance_kwh: raw.appliance_kwh,
            hvac_kwh: raw.hvac_kwh,
            water_heater_kwh: raw.water_heater_kwh,
        });
    }

    if readings.is_empty() {
        return Err(IngestError::Empty);
    }

    readings.sort_by_key(|r| r.timestamp);

    if skipped_rows > 0 {
        debug!(skipped_rows, "dropped rows with unparseable timestamps");
    }

    Ok(ParsedDataset {
        readings,
        skipped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HEADER: &str = "Home_ID,DateTime,Room,Temperature_C,Humidity_%,Light_Lux,Motion_Sensor,Appliance_Usage_kWh,HVAC_Usage_kWh,Water_Heater_kWh";

    fn doc(rows: &[&str]) -> Vec<u8> {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.into_bytes()
    }

    #[test]
    fn test_parses_well_formed_rows() {
        let data = doc(&[
            "H001,2024-06-15 08:00:00,Kitchen,21.5,52.0,180,Active,0.3,0.8,0.4",
            "H001,2024-06-15 07:30:00,Bedroom,20.1,55.5,20,Inactive,0.1,0.6,0.0",
        ]);
        let parsed = parse_csv(&data).unwrap();
        assert_eq!(parsed.readings.len(), 2);
        assert_eq!(parsed.skipped_rows, 0);
        // Sorted ascending by timestamp.
        assert_eq!(parsed.readings[0].room, "Bedroom");
        assert_eq!(parsed.readings[1].room, "Kitchen");
        assert_eq!(parsed.readings[1].motion, MotionState::Active);
        assert_eq!(parsed.readings[1].temperature_c, Some(21.5));
    }

    #[test]
    fn test_bad_numeric_cells_become_none() {
        let data = doc(&[
            "H001,2024-06-15 08:00:00,Kitchen,not-a-number,52.0,,Active,0.3,oops,0.4",
        ]);
        let parsed = parse_csv(&data).unwrap();
        let r = &parsed.readings[0];
        assert_eq!(r.temperature_c, None);
        assert_eq!(r.light_lux, None);
        assert_eq!(r.hvac_kwh, None);
        assert_eq!(r.humidity_pct, Some(52.0));
        assert!((r.total_energy_kwh() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_bad_timestamp_drops_row() {
        let data = doc(&[
            "H001,yesterday-ish,Kitchen,21.5,52.0,180,Active,0.3,0.8,0.4",
            "H001,2024-06-15 08:00:00,Kitchen,21.5,52.0,180,Active,0.3,0.8,0.4",
        ]);
        let parsed = parse_csv(&data).unwrap();
        assert_eq!(parsed.readings.len(), 1);
        assert_eq!(parsed.skipped_rows, 1);
    }

    #[test]
    fn test_unknown_motion_value_reads_inactive() {
        let data = doc(&[
            "H001,2024-06-15 08:00:00,Kitchen,21.5,52.0,180,maybe?,0.3,0.8,0.4",
        ]);
        let parsed = parse_csv(&data).unwrap();
        assert_eq!(parsed.readings[0].motion, MotionState::Inactive);
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let data = b"Home_ID,DateTime,Room,Temperature_C,Humidity_%\nH001,2024-06-15 08:00:00,Kitchen,21.5,52.0";
        match parse_csv(data) {
            Err(IngestError::MissingColumn(col)) => assert_eq!(col, "Motion_Sensor"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_optional_energy_columns_tolerated() {
        let data = b"Home_ID,DateTime,Room,Temperature_C,Humidity_%,Motion_Sensor\nH001,2024-06-15 08:00:00,Kitchen,21.5,52.0,Active";
        let parsed = parse_csv(data).unwrap();
        let r = &parsed.readings[0];
        assert_eq!(r.appliance_kwh, None);
        assert_eq!(r.light_lux, None);
        assert_eq!(r.total_energy_kwh(), 0.0);
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(parse_csv(b""), Err(IngestError::Empty)));
        assert!(matches!(parse_csv(b"  \n "), Err(IngestError::Empty)));
    }

    #[test]
    fn test_header_only_file_rejected() {
        let data = doc(&[]);
        assert!(matches!(parse_csv(&data), Err(IngestError::Empty)));
    }

    #[rstest]
    #[case("2024-06-15 08:30:00")]
    #[case("2024-06-15T08:30:00")]
    #[case("2024-06-15 08:30")]
    #[case("15-06-2024 08:30")]
    #[case("06/15/2024 08:30")]
    fn test_timestamp_formats(#[case] raw: &str) {
        let ts = parse_timestamp(raw).expect("format should parse");
        use chrono::{Datelike, Timelike};
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 6);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 8);
        assert_eq!(ts.minute(), 30);
    }
}
