use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::{MotionFilter, RoomStats};
use crate::monitor::AppState;

use super::{error::ApiError, filter_from, response::ApiResponse};

#[derive(Debug, Deserialize)]
pub struct RoomsQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
}

/// GET /api/v1/rooms - per-room distribution statistics
pub async fn get_room_stats(
    State(st): State<AppState>,
    Query(q): Query<RoomsQuery>,
) -> Result<Json<ApiResponse<Vec<RoomStats>>>, ApiError> {
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let stats = st
        .monitor
        .room_stats(&filter)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    let count = stats.len();
    Ok(Json(ApiResponse::success(stats).with_count(count)))
}
