use axum::{
    routing::{get, post},
    Router,
};

use crate::{config::Config, monitor::AppState};

use super::{dataset, export, occupancy, readings, rooms, series, status, summary};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let router = Router::new()
        .route("/status", get(status::get_status))
        .route("/summary", get(summary::get_summary))
        .route("/readings", get(readings::list_readings))
        .route("/series/energy", get(series::get_energy_series))
        .route("/series/comfort", get(series::get_comfort_series))
        .route("/occupancy", get(occupancy::get_occupancy))
        .route("/rooms", get(rooms::get_room_stats))
        .route("/export", get(export::export_readings))
        .route("/dataset/reload", post(dataset::reload_dataset));

    #[cfg(feature = "sim")]
    let router = router.route("/dataset/simulate", post(dataset::simulate_dataset));

    router
        .with_state(state)
        .layer(crate::auth::auth_layer(&cfg.auth.token))
}
