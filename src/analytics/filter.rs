use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::SensorReading;

/// Three-way motion selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionFilter {
    #[default]
    All,
    ActiveOnly,
    InactiveOnly,
}

/// Reading selection: room, inclusive date range, motion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingFilter {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: MotionFilter,
}

impl ReadingFilter {
    pub fn matches(&self, reading: &SensorReading) -> bool {
        if let Some(room) = &self.room {
            if &reading.room != room {
                return false;
            }
        }
        let date = reading.timestamp.date();
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        match self.motion {
            MotionFilter::All => true,
            MotionFilter::ActiveOnly => reading.motion.is_active(),
            MotionFilter::InactiveOnly => !reading.motion.is_active(),
        }
    }

    /// Select matching readings, preserving input order.
    pub fn apply(&self, readings: &[SensorReading]) -> Vec<SensorReading> {
        readings
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MotionState;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn reading(room: &str, date: (i32, u32, u32), motion: MotionState) -> SensorReading {
        SensorReading {
            home_id: "H001".to_string(),
            timestamp: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            room: room.to_string(),
            temperature_c: Some(21.0),
            humidity_pct: Some(50.0),
            light_lux: None,
            motion,
            appliance_kwh: Some(0.2),
            hvac_kwh: None,
            water_heater_kwh: None,
        }
    }

    fn sample() -> Vec<SensorReading> {
        vec![
            reading("Kitchen", (2024, 6, 14), MotionState::Active),
            reading("Kitchen", (2024, 6, 15), MotionState::Inactive),
            reading("Bedroom", (2024, 6, 15), MotionState::Active),
            reading("Bedroom", (2024, 6, 16), MotionState::Inactive),
        ]
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let filter = ReadingFilter::default();
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_room_filter() {
        let filter = ReadingFilter {
            room: Some("Kitchen".to_string()),
            ..Default::default()
        };
        let out = filter.apply(&sample());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.room == "Kitchen"));
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let filter = ReadingFilter {
            from: Some(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            ..Default::default()
        };
        let out = filter.apply(&sample());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_motion_filter() {
        let active = ReadingFilter {
            motion: MotionFilter::ActiveOnly,
            ..Default::default()
        };
        assert_eq!(active.apply(&sample()).len(), 2);

        let inactive = ReadingFilter {
            motion: MotionFilter::InactiveOnly,
            ..Default::default()
        };
        assert_eq!(inactive.apply(&sample()).len(), 2);
    }

    #[test]
    fn test_unknown_room_matches_nothing() {
        let filter = ReadingFilter {
            room: Some("Garage".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(&sample()).is_empty());
    }

    proptest! {
        // Filtering is idempotent and never grows the selection.
        #[test]
        fn prop_filter_idempotent(room in proptest::option::of("[A-C]"), motion_active in any::<bool>()) {
            let filter = ReadingFilter {
                room: room.clone(),
                motion: if motion_active { MotionFilter::ActiveOnly } else { MotionFilter::All },
                ..Default::default()
            };
            let all = sample();
            let once = filter.apply(&all);
            let twice = filter.apply(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.len() <= all.len());
        }
    }
}
