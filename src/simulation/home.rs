//! Synthetic smart-home dataset generation.
//!
//! Produces sensor readings with realistic time-of-day patterns so the
//! service is usable before a real dataset export exists: morning and
//! evening consumption peaks with a weekend shift, occupancy-driven motion,
//! HVAC load coupled to the outdoor temperature swing, water-heater bumps
//! around showers and dishes, and lighting anti-correlated with daylight.
//! Deterministic for a fixed seed.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::SimConfig;
use crate::domain::{Humidity, MotionState, SensorReading};

pub struct HomeSimulator {
    cfg: SimConfig,
    rng: StdRng,
}

impl HomeSimulator {
    pub fn new(cfg: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self { cfg, rng }
    }

    pub fn seed(&self) -> u64 {
        self.cfg.seed
    }

    /// Generate readings for every home, room and timestep, starting at
    /// `start` and covering `cfg.days` days. Output is sorted by timestamp.
    pub fn generate_from(&mut self, start: NaiveDateTime) -> Vec<SensorReading> {
        let interval_minutes = self.cfg.interval_minutes.max(1) as i64;
        let steps = (self.cfg.days.max(1) as i64 * 24 * 60) / interval_minutes;
        let interval_hours = interval_minutes as f64 / 60.0;
        let rooms = self.cfg.rooms.clone();

        let mut readings = Vec::new();
        for step in 0..steps {
            let ts = start + Duration::minutes(interval_minutes * step);
            for home in 0..self.cfg.homes.max(1) {
                let home_id = format!("H{:03}", home + 1);
                for room in &rooms {
                    readings.push(self.reading_at(ts, &home_id, room, interval_hours));
                }
            }
        }
        readings.sort_by_key(|r| r.timestamp);
        readings
    }

    fn reading_at(
        &mut self,
        ts: NaiveDateTime,
        home_id: &str,
        room: &str,
        interval_hours: f64,
    ) -> SensorReading {
        let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
        let occupied_p = occupancy_probability(ts);
        let occupied = self.rng.gen_bool(occupied_p);

        let outdoor_c = outdoor_temperature(ts);
        let indoor_c = 21.0 + (outdoor_c - 21.0) * 0.15 + self.noise(0.6);
        let humidity = Humidity::new(45.0 + (60.0 - outdoor_c) * 0.3 + self.noise(4.0));

        let daylight = daylight_factor(hour);
        let mut lux = daylight * 800.0;
        if occupied && daylight < 0.3 {
            // Indoor lighting switched on after dark.
            lux += 250.0;
        }
        lux = (lux + self.noise(30.0)).max(0.0);

        let appliance_kw = appliance_load_kw(ts, occupied) * (1.0 + self.noise(0.1));
        let hvac_kw = hvac_load_kw(outdoor_c) * (1.0 + self.noise(0.1));
        let water_kw = water_heater_load_kw(hour) * (1.0 + self.noise(0.15));

        SensorReading {
            home_id: home_id.to_string(),
            timestamp: ts,
            room: room.to_string(),
            temperature_c: Some(round2(indoor_c)),
            humidity_pct: Some(round2(humidity.as_percent())),
            light_lux: Some(round2(lux)),
            motion: if occupied {
                MotionState::Active
            } else {
                MotionState::Inactive
            },
            appliance_kwh: Some(round3((appliance_kw * interval_hours).max(0.0))),
            hvac_kwh: Some(round3((hvac_kw * interval_hours).max(0.0))),
            water_heater_kwh: Some(round3((water_kw * interval_hours).max(0.0))),
        }
    }

    fn noise(&mut self, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return 0.0;
        }
        // std_dev is always positive here, Normal::new cannot fail
        Normal::new(0.0, std_dev)
            .map(|n| n.sample(&mut self.rng))
            .unwrap_or(0.0)
    }
}

/// Probability a room sees motion during this interval.
fn occupancy_probability(ts: NaiveDateTime) -> f64 {
    let hour = ts.hour();
    let is_weekend = ts.weekday().num_days_from_monday() >= 5;

    match hour {
        0..=5 => 0.05,
        6..=8 => 0.55,
        9..=15 => {
            if is_weekend {
                0.45
            } else {
                0.15
            }
        }
        16..=21 => 0.65,
        _ => 0.25,
    }
}

/// Sinusoidal daily outdoor temperature, coldest around 04:00.
fn outdoor_temperature(ts: NaiveDateTime) -> f64 {
    let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
    let phase = (hour - 4.0) / 24.0 * std::f64::consts::TAU;
    15.0 - 6.0 * phase.cos()
}

/// Daylight factor 0..1 peaking at midday.
fn daylight_factor(hour: f64) -> f64 {
    if !(6.0..=20.0).contains(&hour) {
        return 0.0;
    }
    let phase = (hour - 6.0) / 14.0 * std::f64::consts::PI;
    phase.sin().max(0.0)
}

/// Appliance draw in kW with morning/evening peaks.
fn appliance_load_kw(ts: NaiveDateTime, occupied: bool) -> f64 {
    let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
    let base = 0.08;
    let morning = bump(hour, 7.5, 1.5) * 0.35;
    let evening = bump(hour, 18.5, 2.0) * 0.55;
    let occupancy_extra = if occupied { 0.12 } else { 0.0 };
    base + morning + evening + occupancy_extra
}

/// HVAC draw grows with deviation from the 21°C setpoint.
fn hvac_load_kw(outdoor_c: f64) -> f64 {
    let deviation = (outdoor_c - 21.0).abs();
    0.05 + deviation * 0.09
}

/// Water heater peaks with morning showers and evening dishes.
fn water_heater_load_kw(hour: f64) -> f64 {
    bump(hour, 7.0, 1.0) * 0.5 + bump(hour, 20.0, 1.5) * 0.3 + 0.02
}

fn bump(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma.max(0.01);
    (-0.5 * z * z).exp()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
