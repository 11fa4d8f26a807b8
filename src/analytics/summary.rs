use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;

use super::stats::mean_of;
use crate::domain::{Energy, Rate, SensorReading};

/// First and last reading timestamps of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSpan {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

/// Headline metrics over a (possibly filtered) selection of readings,
/// suitable for dashboard metric tiles.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub readings: usize,
    pub homes: usize,
    pub rooms: usize,
    /// Rooms with at least one Active motion reading in the selection.
    pub active_rooms: usize,
    pub total_energy_kwh: f64,
    pub estimated_cost: f64,
    pub avg_temperature_c: Option<f64>,
    pub avg_humidity_pct: Option<f64>,
    pub span: Option<TimeSpan>,
}

/// Summarize a selection. An empty selection yields zero counts and `None`
/// averages, never NaN.
pub fn summarize(readings: &[SensorReading], rate: Rate) -> Summary {
    let homes = readings.iter().map(|r| r.home_id.as_str()).unique().count();
    let rooms = readings.iter().map(|r| r.room.as_str()).unique().count();
    let active_rooms = readings
        .iter()
        .filter(|r| r.motion.is_active())
        .map(|r| r.room.as_str())
        .unique()
        .count();

    let total = Energy::kilowatt_hours(readings.iter().map(|r| r.total_energy_kwh()).sum());

    let span = match (readings.first(), readings.last()) {
        (Some(first), Some(last)) => Some(TimeSpan {
            first: first.timestamp.min(last.timestamp),
            last: first.timestamp.max(last.timestamp),
        }),
        _ => None,
    };

    Summary {
        readings: readings.len(),
        homes,
        rooms,
        active_rooms,
        total_energy_kwh: total.as_kilowatt_hours(),
        estimated_cost: rate * total,
        avg_temperature_c: mean_of(readings.iter().map(|r| r.temperature_c)),
        avg_humidity_pct: mean_of(readings.iter().map(|r| r.humidity_pct)),
        span,
    }
}
