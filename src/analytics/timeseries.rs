use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::stats::mean_of;
use crate::domain::SensorReading;

/// Bucket width for time-series aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Hour,
    Day,
}

impl Resolution {
    pub fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        match self {
            // with_* cannot fail for these in-range values
            Resolution::Hour => ts.with_minute(0).and_then(|t| t.with_second(0)).unwrap_or(ts),
            Resolution::Day => ts.date().and_hms_opt(0, 0, 0).unwrap_or(ts),
        }
    }
}

/// Total energy per (bucket, room) — the stacked area chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyPoint {
    pub bucket_start: NaiveDateTime,
    pub room: String,
    pub energy_kwh: f64,
}

/// Average comfort metrics per bucket — the dual-axis trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComfortPoint {
    pub bucket_start: NaiveDateTime,
    pub avg_temperature_c: Option<f64>,
    pub avg_humidity_pct: Option<f64>,
}

/// Aggregate total energy by bucket and room, ordered by bucket then room.
pub fn energy_series(readings: &[SensorReading], resolution: Resolution) -> Vec<EnergyPoint> {
    let mut buckets: BTreeMap<(NaiveDateTime, &str), f64> = BTreeMap::new();
    for r in readings {
        *buckets
            .entry((resolution.bucket_start(r.timestamp), r.room.as_str()))
            .or_insert(0.0) += r.total_energy_kwh();
    }
    buckets
        .into_iter()
        .map(|((bucket_start, room), energy_kwh)| EnergyPoint {
            bucket_start,
            room: room.to_string(),
            energy_kwh,
        })
        .collect()
}

/// Average temperature and humidity per bucket, ordered by bucket.
pub fn comfort_series(readings: &[SensorReading], resolution: Resolution) -> Vec<ComfortPoint> {
    let mut buckets: BTreeMap<NaiveDateTime, Vec<&SensorReading>> = BTreeMap::new();
    for r in readings {
        buckets
            .entry(resolution.bucket_start(r.timestamp))
            .or_default()
            .push(r);
    }
    buckets
        .into_iter()
        .map(|(bucket_start, rs)| ComfortPoint {
            bucket_start,
            avg_temperature_c: mean_of(rs.iter().map(|r| r.temperature_c)),
            avg_humidity_pct: mean_of(rs.iter().map(|r| r.humidity_pct)),
        })
        .collect()
}
