use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::monitor::AppState;
use crate::store::Provenance;

use super::{dataset::DatasetInfo, error::ApiError, response::ApiResponse};

/// System status response
#[derive(Debug, Serialize)]
pub struct SystemStatus {
    timestamp: DateTime<Utc>,
    dataset: Option<DatasetInfo>,
    system: SystemInfo,
}

/// System information
#[derive(Debug, Serialize)]
pub struct SystemInfo {
    uptime_seconds: u64,
    version: String,
    currency: String,
    mode: String,
}

/// GET /api/v1/status - current dataset and system state
///
/// Returns the loaded snapshot's shape (rows, span, rooms, homes,
/// provenance) plus service uptime and version. `dataset` is null when
/// nothing is loaded yet.
pub async fn get_status(
    State(st): State<AppState>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let snapshot = st.monitor.snapshot().await;

    let mode = match snapshot.as_ref().map(|ds| &ds.provenance) {
        Some(Provenance::Synthetic { .. }) => "synthetic",
        Some(Provenance::File { .. }) => "file",
        None => "empty",
    };

    let status = SystemStatus {
        timestamp: Utc::now(),
        dataset: snapshot.as_ref().map(DatasetInfo::from),
        system: SystemInfo {
            uptime_seconds: st.monitor.uptime_seconds(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            currency: st.monitor.currency().to_string(),
            mode: mode.to_string(),
        },
    };

    Ok(Json(ApiResponse::success(status)))
}
