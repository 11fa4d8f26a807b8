use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::SensorReading;

/// Where the current dataset snapshot came from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    File {
        path: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        modified: Option<DateTime<Utc>>,
    },
    Synthetic {
        seed: u64,
    },
}

/// An immutable dataset snapshot. Readings are shared via `Arc` so cloning
/// a snapshot is cheap and readers never block a reload.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: Uuid,
    pub readings: Arc<Vec<SensorReading>>,
    pub provenance: Provenance,
    pub loaded_at: DateTime<Utc>,
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(readings: Vec<SensorReading>, provenance: Provenance, skipped_rows: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            readings: Arc::new(readings),
            provenance,
            loaded_at: Utc::now(),
            skipped_rows,
        }
    }
}

/// Single-slot dataset holder. A reload swaps the whole snapshot; a failed
/// reload must leave the previous snapshot untouched, so replacement only
/// happens once a new `Dataset` has been fully built.
#[derive(Default)]
pub struct DatasetStore {
    inner: RwLock<Option<Dataset>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, dataset: Dataset) {
        *self.inner.write().await = Some(dataset);
    }

    pub async fn snapshot(&self) -> Option<Dataset> {
        self.inner.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MotionState;
    use chrono::NaiveDate;

    fn sample_reading() -> SensorReading {
        SensorReading {
            home_id: "H001".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            room: "Kitchen".to_string(),
            temperature_c: Some(22.0),
            humidity_pct: Some(50.0),
            light_lux: None,
            motion: MotionState::Inactive,
            appliance_kwh: Some(0.2),
            hvac_kwh: None,
            water_heater_kwh: None,
        }
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let store = DatasetStore::new();
        assert!(!store.is_loaded().await);
        assert!(store.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_replace_and_snapshot() {
        let store = DatasetStore::new();
        let ds = Dataset::new(vec![sample_reading()], Provenance::Synthetic { seed: 7 }, 0);
        let id = ds.id;
        store.replace(ds).await;

        let snap = store.snapshot().await.unwrap();
        assert_eq!(snap.id, id);
        assert_eq!(snap.readings.len(), 1);
        assert!(store.is_loaded().await);
    }

    #[tokio::test]
    async fn test_replace_swaps_snapshot() {
        let store = DatasetStore::new();
        store
            .replace(Dataset::new(vec![], Provenance::Synthetic { seed: 1 }, 0))
            .await;
        let first = store.snapshot().await.unwrap().id;
        store
            .replace(Dataset::new(
                vec![sample_reading()],
                Provenance::Synthetic { seed: 2 },
                0,
            ))
            .await;
        let snap = store.snapshot().await.unwrap();
        assert_ne!(snap.id, first);
        assert_eq!(snap.readings.len(), 1);
    }
}
