use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::MotionFilter;
use crate::domain::SensorReading;
use crate::monitor::AppState;

use super::{error::ApiError, filter_from};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub room: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub motion: Option<MotionFilter>,
}

/// One exported CSV row, using the dataset's original column names plus the
/// derived total, so an export round-trips through the same ingest path.
#[derive(Debug, Serialize)]
struct ExportRow {
    #[serde(rename = "Home_ID")]
    home_id: String,
    #[serde(rename = "DateTime")]
    datetime: String,
    #[serde(rename = "Room")]
    room: String,
    #[serde(rename = "Temperature_C")]
    temperature_c: Option<f64>,
    #[serde(rename = "Humidity_%")]
    humidity_pct: Option<f64>,
    #[serde(rename = "Light_Lux")]
    light_lux: Option<f64>,
    #[serde(rename = "Motion_Sensor")]
    motion: String,
    #[serde(rename = "Appliance_Usage_kWh")]
    appliance_kwh: Option<f64>,
    #[serde(rename = "HVAC_Usage_kWh")]
    hvac_kwh: Option<f64>,
    #[serde(rename = "Water_Heater_kWh")]
    water_heater_kwh: Option<f64>,
    #[serde(rename = "Total_Energy_kWh")]
    total_energy_kwh: f64,
}

impl From<&SensorReading> for ExportRow {
    fn from(r: &SensorReading) -> Self {
        Self {
            home_id: r.home_id.clone(),
            datetime: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            room: r.room.clone(),
            temperature_c: r.temperature_c,
            humidity_pct: r.humidity_pct,
            light_lux: r.light_lux,
            motion: r.motion.to_string(),
            appliance_kwh: r.appliance_kwh,
            hvac_kwh: r.hvac_kwh,
            water_heater_kwh: r.water_heater_kwh,
            total_energy_kwh: r.total_energy_kwh(),
        }
    }
}

pub fn to_csv(readings: &[SensorReading]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for reading in readings {
        writer
            .serialize(ExportRow::from(reading))
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::InternalError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::InternalError(e.to_string()))
}

/// GET /api/v1/export - filtered readings as a CSV attachment
pub async fn export_readings(
    State(st): State<AppState>,
    Query(q): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = filter_from(q.room, q.from, q.to, q.motion);
    let rows = st
        .monitor
        .filtered(&filter)
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("no dataset loaded".to_string()))?;
    let body = to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"smart_home_readings.csv\"",
            ),
        ],
        body,
    ))
}
