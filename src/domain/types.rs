use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use strum_macros::{Display, EnumString};

// ============================================================================
// Physical Unit Newtypes
// ============================================================================

/// Energy in kilowatt-hours (kWh), the native unit of the dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Energy(pub f64);

impl Energy {
    pub fn kilowatt_hours(kwh: f64) -> Self {
        Self(kwh)
    }

    pub fn watt_hours(wh: f64) -> Self {
        Self(wh / 1000.0)
    }

    pub fn as_kilowatt_hours(&self) -> f64 {
        self.0
    }

    pub fn as_watt_hours(&self) -> f64 {
        self.0 * 1000.0
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() < 1.0 {
            write!(f, "{:.1} Wh", self.as_watt_hours())
        } else {
            write!(f, "{:.2} kWh", self.0)
        }
    }
}

impl Add for Energy {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Energy {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Temperature in Celsius (°C)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Temperature(pub f64);

impl Temperature {
    pub fn celsius(c: f64) -> Self {
        Self(c)
    }

    pub fn fahrenheit(f: f64) -> Self {
        Self((f - 32.0) * 5.0 / 9.0)
    }

    pub fn as_celsius(&self) -> f64 {
        self.0
    }

    pub fn as_fahrenheit(&self) -> f64 {
        self.0 * 9.0 / 5.0 + 32.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

/// Relative humidity (0-100%)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Humidity(pub f64);

impl Humidity {
    pub fn new(percent: f64) -> Self {
        Self(percent.clamp(0.0, 100.0))
    }

    pub fn from_ratio(ratio: f64) -> Self {
        Self((ratio * 100.0).clamp(0.0, 100.0))
    }

    pub fn as_percent(&self) -> f64 {
        self.0
    }

    pub fn as_ratio(&self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for Humidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Illuminance in lux
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Illuminance(pub f64);

impl Illuminance {
    pub fn lux(lx: f64) -> Self {
        Self(lx.max(0.0))
    }

    pub fn as_lux(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Illuminance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} lx", self.0)
    }
}

/// Electricity tariff rate per kilowatt-hour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Rate(pub f64);

impl Rate {
    pub fn per_kwh(rate: f64) -> Self {
        Self(rate)
    }

    pub fn as_per_kwh(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}/kWh", self.0)
    }
}

impl Mul<Energy> for Rate {
    type Output = f64; // Cost in the tariff currency
    fn mul(self, energy: Energy) -> Self::Output {
        self.0 * energy.as_kilowatt_hours()
    }
}

// ============================================================================
// Sensor and Device Categories
// ============================================================================

/// Motion sensor state as recorded in the dataset
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum MotionState {
    Active,
    #[default]
    Inactive,
}

impl MotionState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Energy-consuming device categories tracked per reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Appliance,
    Hvac,
    WaterHeater,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 3] = [Self::Appliance, Self::Hvac, Self::WaterHeater];
}

// ============================================================================
// Unit Tests
// ============================================================================
