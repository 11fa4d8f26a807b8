use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{MotionFilter, OccupancyMatrix, RoomActivity};
use crate::monitor::AppState;

use super::{error::ApiError, filter_from, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
}

#[derive(Debug, Serialize)]
pub struct OccupancyReport {
    pub matrix: OccupancyMatrix,
    pub activity: Vec<RoomActivity>,
}

/// GET /api/v1/occupancy - active-motion heatmap and per-room activity
pub async fn get_occupancy(
    State(st): State<AppState>,
    Query(q): Query<OccupancyQuery>,
) -> Result<Json<ApiResponse<OccupancyReport>>, ApiError> {
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let (matrix, activity) = st
        .monitor
        .occupancy(&filter)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    Ok(Json(ApiResponse::success(OccupancyReport { matrix, activity })))
}
