pub mod filter;
pub mod occupancy;
pub mod rooms;
pub mod stats;
pub mod summary;
pub mod timeseries;

pub use filter::{MotionFilter, ReadingFilter};
pub use occupancy::{occupancy_matrix, room_activity, OccupancyMatrix, RoomActivity};
pub use rooms::{room_stats, RoomStats};
pub use stats::Distribution;
pub use summary::{summarize, Summary, TimeSpan};
pub use timeseries::{comfort_series, energy_series, ComfortPoint, EnergyPoint, Resolution};
