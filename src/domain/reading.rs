use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::{DeviceCategory, MotionState};

/// A single sensor reading: one row of the smart-home dataset.
///
/// Numeric fields are `Option` because the source data carries gaps; a
/// missing energy cell contributes zero to totals rather than poisoning
/// them with NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub home_id: String,
    pub timestamp: NaiveDateTime,
    pub room: String,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub light_lux: Option<f64>,
    pub motion: MotionState,
    pub appliance_kwh: Option<f64>,
    pub hvac_kwh: Option<f64>,
    pub water_heater_kwh: Option<f64>,
}

impl SensorReading {
    /// Total energy across all device categories, missing cells counting as 0.
    pub fn total_energy_kwh(&self) -> f64 {
        self.appliance_kwh.unwrap_or(0.0)
            + self.hvac_kwh.unwrap_or(0.0)
            + self.water_heater_kwh.unwrap_or(0.0)
    }

    pub fn energy_for(&self, category: DeviceCategory) -> Option<f64> {
        match category {
            DeviceCategory::Appliance => self.appliance_kwh,
            DeviceCategory::Hvac => self.hvac_kwh,
            DeviceCategory::WaterHeater => self.water_heater_kwh,
        }
    }

    pub fn hour(&self) -> u32 {
        use chrono::Timelike;
        self.timestamp.hour()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(appliance: Option<f64>, hvac: Option<f64>, water: Option<f64>) -> SensorReading {
        SensorReading {
            home_id: "H001".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            room: "Kitchen".to_string(),
            temperature_c: Some(22.5),
            humidity_pct: Some(48.0),
            light_lux: Some(310.0),
            motion: MotionState::Active,
            appliance_kwh: appliance,
            hvac_kwh: hvac,
            water_heater_kwh: water,
        }
    }

    #[test]
    fn test_total_energy_sums_categories() {
        let r = reading(Some(0.4), Some(1.2), Some(0.3));
        assert!((r.total_energy_kwh() - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_total_energy_missing_cells_count_zero() {
        let r = reading(Some(0.4), None, None);
        assert!((r.total_energy_kwh() - 0.4).abs() < 1e-9);

        let empty = reading(None, None, None);
        assert_eq!(empty.total_energy_kwh(), 0.0);
    }

    #[test]
    fn test_energy_for_category() {
        let r = reading(Some(0.4), Some(1.2), None);
        assert_eq!(r.energy_for(DeviceCategory::Appliance), Some(0.4));
        assert_eq!(r.energy_for(DeviceCategory::Hvac), Some(1.2));
        assert_eq!(r.energy_for(DeviceCategory::WaterHeater), None);
    }

    #[test]
    fn test_hour() {
        let r = reading(None, None, None);
        assert_eq!(r.hour(), 18);
    }
}
