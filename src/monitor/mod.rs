use anyhow::Result;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::analytics::{
    comfort_series, energy_series, occupancy_matrix, room_activity, room_stats, summarize,
    ComfortPoint, EnergyPoint, OccupancyMatrix, ReadingFilter, Resolution, RoomActivity,
    RoomStats, Summary,
};
use crate::config::Config;
use crate::domain::{Rate, SensorReading};
use crate::ingest::{DatasetSource, FileSource};
use crate::store::{Dataset, DatasetStore, Provenance};

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub monitor: Arc<HomeMonitor>,
}

impl AppState {
    pub async fn new(cfg: Config) -> Result<Self> {
        let monitor = Arc::new(HomeMonitor::new(cfg.clone()));
        monitor.load_initial().await?;
        Ok(Self { cfg, monitor })
    }
}

pub fn spawn_monitor_tasks(state: AppState, cfg: Config) {
    let monitor = state.monitor.clone();
    tokio::spawn(async move {
        if let Err(e) = monitor.refresh_loop(cfg.dataset.refresh_seconds).await {
            warn!(error=%e, "dataset refresh loop stopped");
        }
    });
}

/// Owns the dataset store and answers every analytics question the API
/// asks. Reads work on a cheap snapshot clone so a concurrent reload never
/// blocks a request.
pub struct HomeMonitor {
    cfg: Config,
    store: DatasetStore,
    source: FileSource,
}

impl HomeMonitor {
    pub fn new(cfg: Config) -> Self {
        let source = FileSource::new(cfg.dataset.path.clone());
        Self {
            cfg,
            store: DatasetStore::new(),
            source,
        }
    }

    /// Load the dataset at startup: prefer the configured CSV, fall back to
    /// a synthetic dataset when the file is absent and `sim` is compiled in.
    pub async fn load_initial(&self) -> Result<()> {
        if self.source.exists() {
            self.reload().await?;
            return Ok(());
        }

        #[cfg(feature = "sim")]
        {
            warn!(
                path = %self.source.describe(),
                "dataset file not found, generating synthetic data"
            );
            self.regenerate(None).await?;
            Ok(())
        }

        #[cfg(not(feature = "sim"))]
        {
            anyhow::bail!(
                "dataset file not found: {} (no synthetic fallback in this build)",
                self.source.describe()
            )
        }
    }

    /// Reload from the source file, swapping the snapshot only on success.
    pub async fn reload(&self) -> Result<Dataset> {
        let modified = self.source.modified().await;
        let parsed = self.source.load().await?;
        let dataset = Dataset::new(
            parsed.readings,
            Provenance::File {
                path: self.source.path().to_path_buf(),
                modified,
            },
            parsed.skipped_rows,
        );
        info!(
            rows = dataset.readings.len(),
            skipped_rows = dataset.skipped_rows,
            path = %self.source.describe(),
            "dataset loaded"
        );
        self.store.replace(dataset.clone()).await;
        Ok(dataset)
    }

    /// Replace the snapshot with freshly generated synthetic data.
    #[cfg(feature = "sim")]
    pub async fn regenerate(&self, seed: Option<u64>) -> Result<Dataset> {
        use crate::simulation::HomeSimulator;
        use chrono::{Duration, Local};

        let mut sim_cfg = self.cfg.sim.clone();
        if let Some(seed) = seed {
            sim_cfg.seed = seed;
        }
        let seed = sim_cfg.seed;
        let days = sim_cfg.days.max(1) as i64;

        let start = (Local::now().naive_local() - Duration::days(days))
            .date()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| Local::now().naive_local());

        let readings = HomeSimulator::new(sim_cfg).generate_from(start);
        let dataset = Dataset::new(readings, Provenance::Synthetic { seed }, 0);
        info!(rows = dataset.readings.len(), seed, "synthetic dataset generated");
        self.store.replace(dataset.clone()).await;
        Ok(dataset)
    }

    /// Poll the source file and reload when its mtime moves. A failed
    /// reload logs and keeps serving the previous snapshot.
    pub async fn refresh_loop(&self, refresh_seconds: u64) -> Result<()> {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(refresh_seconds.max(1)));
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            if !self.source.exists() {
                continue;
            }
            let latest = self.source.modified().await;
            let current = match self.store.snapshot().await {
                Some(ds) => match ds.provenance {
                    Provenance::File { modified, .. } => modified,
                    // Synthetic snapshot: a file appearing on disk replaces it.
                    Provenance::Synthetic { .. } => None,
                },
                None => None,
            };
            if latest.is_some() && latest == current {
                continue;
            }
            if let Err(e) = self.reload().await {
                warn!(error=%e, "dataset refresh failed, keeping previous snapshot");
            }
        }
    }

    pub async fn snapshot(&self) -> Option<Dataset> {
        self.store.snapshot().await
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_loaded().await
    }

    pub fn uptime_seconds(&self) -> u64 {
        PROCESS_START.elapsed().as_secs()
    }

    pub fn currency(&self) -> &str {
        &self.cfg.tariff.currency
    }

    pub fn rate(&self, override_rate: Option<f64>) -> Rate {
        Rate::per_kwh(override_rate.unwrap_or(self.cfg.tariff.rate_per_kwh))
    }

    /// Apply a filter against the current snapshot. `None` means no dataset
    /// is loaded (distinct from an empty selection).
    pub async fn filtered(&self, filter: &ReadingFilter) -> Option<Vec<SensorReading>> {
        let snapshot = self.store.snapshot().await?;
        Some(filter.apply(&snapshot.readings))
    }

    pub async fn summary(
        &self,
        filter: &ReadingFilter,
        rate_override: Option<f64>,
    ) -> Option<Summary> {
        let selection = self.filtered(filter).await?;
        Some(summarize(&selection, self.rate(rate_override)))
    }

    pub async fn energy_series(
        &self,
        filter: &ReadingFilter,
        resolution: Resolution,
    ) -> Option<Vec<EnergyPoint>> {
        let selection = self.filtered(filter).await?;
        Some(energy_series(&selection, resolution))
    }

    pub async fn comfort_series(
        &self,
        filter: &ReadingFilter,
        resolution: Resolution,
    ) -> Option<Vec<ComfortPoint>> {
        let selection = self.filtered(filter).await?;
        Some(comfort_series(&selection, resolution))
    }

    pub async fn occupancy(
        &self,
        filter: &ReadingFilter,
    ) -> Option<(OccupancyMatrix, Vec<RoomActivity>)> {
        let selection = self.filtered(filter).await?;
        Some((occupancy_matrix(&selection), room_activity(&selection)))
    }

    pub async fn room_stats(&self, filter: &ReadingFilter) -> Option<Vec<RoomStats>> {
        let selection = self.filtered(filter).await?;
        Some(room_stats(&selection))
    }

    /// Filtered readings, newest first, paginated. Returns the page and the
    /// total matching count.
    pub async fn readings_page(
        &self,
        filter: &ReadingFilter,
        page: usize,
        page_size: usize,
    ) -> Option<(Vec<SensorReading>, usize)> {
        let mut selection = self.filtered(filter).await?;
        selection.reverse(); // snapshot is sorted ascending
        let total = selection.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let page_rows = selection
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect();
        Some((page_rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MotionFilter;
    use crate::config::{
        AuthConfig, DatasetConfig, ServerConfig, SimConfig, TariffConfig,
    };

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                enable_cors: false,
                request_timeout_secs: 5,
            },
            auth: AuthConfig {
                token: "devtoken".to_string(),
            },
            dataset: DatasetConfig {
                path: "does/not/exist.csv".into(),
                refresh_seconds: 300,
            },
            tariff: TariffConfig {
                currency: "USD".to_string(),
                rate_per_kwh: 0.15,
            },
            sim: SimConfig {
                homes: 1,
                rooms: vec!["Kitchen".to_string(), "Bedroom".to_string()],
                days: 1,
                interval_minutes: 60,
                seed: 42,
            },
        }
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn test_initial_load_falls_back_to_synthetic() {
        let monitor = HomeMonitor::new(test_config());
        monitor.load_initial().await.unwrap();
        assert!(monitor.is_ready().await);

        let snapshot = monitor.snapshot().await.unwrap();
        assert!(matches!(
            snapshot.provenance,
            Provenance::Synthetic { seed: 42 }
        ));
        // 1 day x 24 steps x 1 home x 2 rooms
        assert_eq!(snapshot.readings.len(), 48);
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn test_queries_against_snapshot() {
        let monitor = HomeMonitor::new(test_config());
        monitor.load_initial().await.unwrap();

        let all = ReadingFilter::default();
        let summary = monitor.summary(&all, None).await.unwrap();
        assert_eq!(summary.readings, 48);
        assert_eq!(summary.rooms, 2);
        assert!(summary.total_energy_kwh > 0.0);

        let kitchen = ReadingFilter {
            room: Some("Kitchen".to_string()),
            ..Default::default()
        };
        let summary = monitor.summary(&kitchen, None).await.unwrap();
        assert_eq!(summary.readings, 24);

        let (matrix, activity) = monitor.occupancy(&all).await.unwrap();
        assert_eq!(matrix.rooms.len(), 2);
        assert_eq!(activity.len(), 2);
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn test_rate_override_scales_cost() {
        let monitor = HomeMonitor::new(test_config());
        monitor.load_initial().await.unwrap();

        let all = ReadingFilter::default();
        let base = monitor.summary(&all, None).await.unwrap();
        let doubled = monitor.summary(&all, Some(0.30)).await.unwrap();
        assert!((doubled.estimated_cost - base.estimated_cost * 2.0).abs() < 1e-9);
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn test_readings_page_newest_first() {
        let monitor = HomeMonitor::new(test_config());
        monitor.load_initial().await.unwrap();

        let all = ReadingFilter::default();
        let (page, total) = monitor.readings_page(&all, 1, 10).await.unwrap();
        assert_eq!(total, 48);
        assert_eq!(page.len(), 10);
        assert!(page.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let (last_page, _) = monitor.readings_page(&all, 5, 10).await.unwrap();
        assert_eq!(last_page.len(), 8);

        let (beyond, _) = monitor.readings_page(&all, 10, 10).await.unwrap();
        assert!(beyond.is_empty());
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn test_filtered_motion_only() {
        let monitor = HomeMonitor::new(test_config());
        monitor.load_initial().await.unwrap();

        let active = ReadingFilter {
            motion: MotionFilter::ActiveOnly,
            ..Default::default()
        };
        let rows = monitor.filtered(&active).await.unwrap();
        assert!(rows.iter().all(|r| r.motion.is_active()));
    }
}
