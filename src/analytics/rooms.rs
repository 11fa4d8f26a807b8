use itertools::Itertools;
use serde::Serialize;

use super::stats::Distribution;
use crate::domain::SensorReading;

/// Per-room distribution statistics — the box/violin comparison charts.
/// A metric with no present values in a room is `None`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomStats {
    pub room: String,
    pub readings: usize,
    pub energy_kwh: Option<Distribution>,
    pub temperature_c: Option<Distribution>,
    pub humidity_pct: Option<Distribution>,
    pub light_lux: Option<Distribution>,
    pub motion_active_pct: f64,
}

pub fn room_stats(readings: &[SensorReading]) -> Vec<RoomStats> {
    let rooms: Vec<&str> = readings
        .iter()
        .map(|r| r.room.as_str())
        .unique()
        .sorted()
        .collect();

    rooms
        .into_iter()
        .map(|room| {
            let rs: Vec<&SensorReading> =
                readings.iter().filter(|r| r.room == room).collect();
            let active = rs.iter().filter(|r| r.motion.is_active()).count();

            RoomStats {
                room: room.to_string(),
                readings: rs.len(),
                energy_kwh: Distribution::from_values(
                    rs.iter().map(|r| r.total_energy_kwh()).collect(),
                ),
                temperature_c: Distribution::from_values(
                    rs.iter().filter_map(|r| r.temperature_c).collect(),
                ),
                humidity_pct: Distribution::from_values(
                    rs.iter().filter_map(|r| r.humidity_pct).collect(),
                ),
                light_lux: Distribution::from_values(
                    rs.iter().filter_map(|r| r.light_lux).collect(),
                ),
                motion_active_pct: active as f64 / rs.len() as f64 * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MotionState;
    use chrono::NaiveDate;

    fn reading(room: &str, temp: Option<f64>, energy: f64, motion: MotionState) -> SensorReading {
        SensorReading {
            home_id: "H001".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            room: room.to_string(),
            temperature_c: temp,
            humidity_pct: None,
            light_lux: None,
            motion,
            appliance_kwh: Some(energy),
            hvac_kwh: None,
            water_heater_kwh: None,
        }
    }

    #[test]
    fn test_rooms_sorted_and_counted() {
        let readings = vec![
            reading("Kitchen", Some(20.0), 0.5, MotionState::Active),
            reading("Bedroom", Some(18.0), 0.1, MotionState::Inactive),
            reading("Kitchen", Some(22.0), 0.3, MotionState::Inactive),
        ];
        let stats = room_stats(&readings);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].room, "Bedroom");
        assert_eq!(stats[1].room, "Kitchen");
        assert_eq!(stats[1].readings, 2);

        let energy = stats[1].energy_kwh.as_ref().unwrap();
        assert_eq!(energy.min, 0.3);
        assert_eq!(energy.max, 0.5);
        assert!((stats[1].motion_active_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_metric_with_no_present_values_is_none() {
        let readings = vec![reading("Kitchen", None, 0.2, MotionState::Inactive)];
        let stats = room_stats(&readings);
        assert!(stats[0].temperature_c.is_none());
        assert!(stats[0].humidity_pct.is_none());
        assert!(stats[0].light_lux.is_none());
        assert!(stats[0].energy_kwh.is_some());
    }

    #[test]
    fn test_empty_selection() {
        assert!(room_stats(&[]).is_empty());
    }
}
