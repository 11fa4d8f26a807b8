pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod monitor;
#[cfg(feature = "sim")]
pub mod simulation;
pub mod store;
pub mod telemetry;
