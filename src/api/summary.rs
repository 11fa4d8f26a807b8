use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::analytics::{MotionFilter, Summary};
use crate::monitor::AppState;

use super::{error::ApiError, filter_from, response::ApiResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
    /// Per-request tariff override, in currency units per kWh.
    #[validate(range(min = 0.01, max = 10.0))]
    pub rate: Option<f64>,
}

/// GET /api/v1/summary - headline metrics over the filtered selection
pub async fn get_summary(
    State(st): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<Summary>>, ApiError> {
    q.validate()?;
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let summary = st
        .monitor
        .summary(&filter, q.rate)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    let count = summary.readings;
    Ok(Json(ApiResponse::success(summary).with_count(count)))
}
