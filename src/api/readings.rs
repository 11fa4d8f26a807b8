use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::analytics::MotionFilter;
use crate::domain::SensorReading;
use crate::monitor::AppState;

use super::{error::ApiError, filter_from, response::ApiResponse};

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReadingsQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: usize,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 500))]
    pub page_size: usize,
}

/// GET /api/v1/readings - filtered readings, newest first, paginated
pub async fn list_readings(
    State(st): State<AppState>,
    Query(q): Query<ReadingsQuery>,
) -> Result<Json<ApiResponse<Vec<SensorReading>>>, ApiError> {
    q.validate()?;
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let (rows, total) = st
        .monitor
        .readings_page(&filter, q.page, q.page_size)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    Ok(Json(
        ApiResponse::success(rows).with_pagination(q.page, q.page_size, total),
    ))
}
