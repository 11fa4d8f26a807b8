use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::SensorReading;

/// Active-motion counts per (room, hour of day) — the occupancy heatmap.
///
/// `counts[i][h]` is the number of Active readings for `rooms[i]` during
/// hour `h` (0-23) across the whole selection.
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyMatrix {
    pub rooms: Vec<String>,
    pub counts: Vec<[u64; 24]>,
}

impl OccupancyMatrix {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Share of Active readings per room — the activity bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomActivity {
    pub room: String,
    pub readings: usize,
    pub active_pct: f64,
}

pub fn occupancy_matrix(readings: &[SensorReading]) -> OccupancyMatrix {
    let rooms: Vec<String> = readings
        .iter()
        .map(|r| r.room.clone())
        .unique()
        .sorted()
        .collect();
    let index: HashMap<&str, usize> = rooms
        .iter()
        .enumerate()
        .map(|(i, room)| (room.as_str(), i))
        .collect();

    let mut counts = vec![[0u64; 24]; rooms.len()];
    for r in readings.iter().filter(|r| r.motion.is_active()) {
        if let Some(&i) = index.get(r.room.as_str()) {
            counts[i][r.hour() as usize] += 1;
        }
    }

    OccupancyMatrix { rooms, counts }
}

pub fn room_activity(readings: &[SensorReading]) -> Vec<RoomActivity> {
    let mut totals: HashMap<&str, (usize, usize)> = HashMap::new();
    for r in readings {
        let entry = totals.entry(r.room.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if r.motion.is_active() {
            entry.1 += 1;
        }
    }
    totals
        .into_iter()
        .map(|(room, (total, active))| RoomActivity {
            room: room.to_string(),
            readings: total,
            active_pct: active as f64 / total as f64 * 100.0,
        })
        .sorted_by(|a, b| a.room.cmp(&b.room))
        .collect()
}
