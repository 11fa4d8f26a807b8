pub mod dataset;
pub mod error;
pub mod export;
pub mod health;
pub mod occupancy;
pub mod readings;
pub mod response;
pub mod rooms;
pub mod series;
pub mod status;
pub mod summary;
pub mod v1;

use axum::Router;
use chrono::NaiveDate;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::analytics::{MotionFilter, ReadingFilter};
use crate::{config::Config, monitor::AppState};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .nest("/api/v1", v1::router(state.clone(), cfg))
        .merge(health::router(state));

    if cfg.server.enable_cors {
        use tower_http::cors::AllowOrigin;
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::exact("http://localhost:3000".parse().unwrap()))
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

#[cfg(feature = "metrics")]
pub fn with_metrics(app: Router, cfg: &Config) -> Router {
    use axum_prometheus::PrometheusMetricLayer;
    let (layer, handle) = PrometheusMetricLayer::pair();

    let metrics_router = Router::new()
        .route(
            "/metrics",
            axum::routing::get(move || async move { handle.render() }),
        )
        .layer(crate::auth::auth_layer(&cfg.auth.token));

    app.layer(layer).merge(metrics_router)
}

/// Assemble a `ReadingFilter` from the query parameters every read
/// endpoint shares.
pub(crate) fn filter_from(
    room: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    motion: Option<MotionFilter>,
) -> ReadingFilter {
    ReadingFilter {
        room,
        from,
        to,
        motion: motion.unwrap_or_default(),
    }
}
