use axum::extract::State;
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use uuid::Uuid;

use crate::monitor::AppState;
use crate::store::{Dataset, Provenance};

use super::{error::ApiError, response::ApiResponse};

/// Dataset snapshot description shared by the status and reload endpoints.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub id: Uuid,
    pub rows: usize,
    pub skipped_rows: usize,
    pub homes: usize,
    pub rooms: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub provenance: Provenance,
    pub loaded_at: DateTime<Utc>,
}

impl From<&Dataset> for DatasetInfo {
    fn from(ds: &Dataset) -> Self {
        Self {
            id: ds.id,
            rows: ds.readings.len(),
            skipped_rows: ds.skipped_rows,
            homes: ds.readings.iter().map(|r| r.home_id.as_str()).unique().count(),
            rooms: ds.readings.iter().map(|r| r.room.as_str()).unique().count(),
            first: ds.readings.first().map(|r| r.timestamp),
            last: ds.readings.last().map(|r| r.timestamp),
            provenance: ds.provenance.clone(),
            loaded_at: ds.loaded_at,
        }
    }
}

/// POST /api/v1/dataset/reload - re-read the source file
pub async fn reload_dataset(
    State(st): State<AppState>,
) -> Result<Json<ApiResponse<DatasetInfo>>, ApiError> {
    let dataset = st
        .monitor
        .reload()
        .await
        .map_err(|e| ApiError::IngestError(e.to_string()))?;
    Ok(Json(ApiResponse::success(DatasetInfo::from(&dataset))))
}

#[cfg(feature = "sim")]
#[derive(Debug, serde::Deserialize)]
pub struct SimulateQuery {
    pub seed: Option<u64>,
}

/// POST /api/v1/dataset/simulate - replace the snapshot with synthetic data
#[cfg(feature = "sim")]
pub async fn simulate_dataset(
    State(st): State<AppState>,
    axum::extract::Query(q): axum::extract::Query<SimulateQuery>,
) -> Result<Json<ApiResponse<DatasetInfo>>, ApiError> {
    let dataset = st
        .monitor
        .regenerate(q.seed)
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    Ok(Json(ApiResponse::success(DatasetInfo::from(&dataset))))
}
