use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::{ComfortPoint, EnergyPoint, MotionFilter, Resolution};
use crate::monitor::AppState;

use super::{error::ApiError, filter_from, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
    #[serde(default)]
    pub resolution: Resolution,
}

/// GET /api/v1/series/energy - total energy per bucket and room
pub async fn get_energy_series(
    State(st): State<AppState>,
    Query(q): Query<SeriesQuery>,
) -> Result<Json<ApiResponse<Vec<EnergyPoint>>>, ApiError> {
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let series = st
        .monitor
        .energy_series(&filter, q.resolution)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    let count = series.len();
    Ok(Json(ApiResponse::success(series).with_count(count)))
}

/// GET /api/v1/series/comfort - average temperature & humidity per bucket
pub async fn get_comfort_series(
    State(st): State<AppState>,
    Query(q): Query<SeriesQuery>,
) -> Result<Json<ApiResponse<Vec<ComfortPoint>>>, ApiError> {
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let series = st
        .monitor
        .comfort_series(&filter, q.resolution)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    let count = series.len();
    Ok(Json(ApiResponse::success(series).with_count(count)))
}
