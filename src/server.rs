/// HTTP API for the dashboard.
///
/// Routes:
///   GET /                              liveness text
///   GET /api/user-analysis-data        per-metric history, pie filler and forecast
///   GET /api/expert-analysis-data      redirect to the user endpoint
///   GET /api/river-segments/{metric}   map status for each river segment
///
/// The baseline store is blocking (`postgres::Client`), so store calls run
/// on `spawn_blocking` behind a mutex. Simulation runs inline: it is pure
/// in-memory work with a fresh `EntropySource` per request.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::alert::{SegmentReport, segment_report};
use crate::config::AppConfig;
use crate::logging::{self, Component};
use crate::model::{BaselineReading, EngineError, Metric};
use crate::random::EntropySource;
use crate::report::{DashboardReport, build_dashboard};
use crate::simulate::generate_history;
use crate::store::{BaselineStore, StoreError};

pub const ROOT_MESSAGE: &str = "Nirmal Dhara API Running";

/// Baseline store shared by all request handlers.
pub type SharedStore = Arc<Mutex<Box<dyn BaselineStore>>>;

pub fn shared_store(store: Box<dyn BaselineStore>) -> SharedStore {
    Arc::new(Mutex::new(store))
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] StoreError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Engine(err) => {
                logging::warn(Component::Api, None, &format!("Rejected request: {err}"));
                let body = Json(json!({ "msg": err.to_string() }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            // The store already logged the cause under DB.
            ApiError::Upstream(err) => {
                logging::warn(Component::Api, None, &format!("Baseline unavailable: {err}"));
            }
            ApiError::Internal(reason) => {
                logging::error(Component::Api, None, &format!("Request failed: {reason}"));
            }
        }
        let body = Json(json!({ "msg": "Server Error" }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/user-analysis-data", get(user_analysis_data))
        .route("/api/expert-analysis-data", get(expert_analysis_data))
        .route("/api/river-segments/{metric}", get(river_segments))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `config.server.bind_addr` and serves until Ctrl-C.
pub async fn serve(config: AppConfig, store: SharedStore) -> std::io::Result<()> {
    let addr = config.server.bind_addr.clone();
    let app = router(AppState::new(config, store));

    let listener = TcpListener::bind(&addr).await?;
    logging::info(Component::System, None, &format!("Server started on {addr}"));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        let message = format!("Failed to listen for shutdown signal: {e}");
        logging::error(Component::System, None, &message);
        std::future::pending::<()>().await;
    }
    logging::info(Component::System, None, "Shutdown signal received");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> &'static str {
    ROOT_MESSAGE
}

async fn user_analysis_data(
    State(state): State<AppState>,
) -> Result<Json<DashboardReport>, ApiError> {
    let baseline = load_baseline(&state).await?;
    let sim = &state.config.simulation;

    let mut rng = EntropySource::new();
    let report = build_dashboard(
        &baseline,
        &sim.history_params(),
        sim.horizon_days,
        Utc::now().date_naive(),
        &mut rng,
    );

    let alert_count: usize = report
        .values()
        .next()
        .map(|r| {
            r.predictions
                .iter()
                .map(|p| p.triggered_alerts.len())
                .sum::<usize>()
        })
        .unwrap_or(0);
    logging::debug(
        Component::Engine,
        Some(&baseline.location),
        &format!("Generated dashboard with {alert_count} forecast alert(s)"),
    );

    Ok(Json(report))
}

async fn expert_analysis_data() -> Redirect {
    Redirect::to("/api/user-analysis-data")
}

async fn river_segments(
    State(state): State<AppState>,
    Path(metric_key): Path<String>,
) -> Result<Json<SegmentReport>, ApiError> {
    let metric: Metric = metric_key.parse()?;
    let baseline = load_baseline(&state).await?;

    let mut rng = EntropySource::new();
    let params = state.config.simulation.history_params();
    let history = generate_history(&baseline, metric, &params, &mut rng);
    let latest = history.last().copied().unwrap_or_else(|| baseline.value(metric));

    Ok(Json(segment_report(metric, latest, &mut rng)))
}

/// Fetches (or lazily creates) the configured location's baseline.
async fn load_baseline(state: &AppState) -> Result<BaselineReading, ApiError> {
    let store = Arc::clone(&state.store);
    let location = state.config.server.location.clone();

    let result = tokio::task::spawn_blocking(move || {
        let mut store = store
            .lock()
            .map_err(|_| StoreError::Unavailable("baseline store lock poisoned".to_string()))?;
        store
            .fetch_or_create(&location, Utc::now())
            .inspect_err(|err| logging::log_store_failure(&location, "fetch_or_create", err))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("baseline task failed: {e}")))?;

    Ok(result?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Collects formatted log output so tests can inspect it.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn respond_and_capture(err: ApiError) -> (StatusCode, String) {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let status = tracing::subscriber::with_default(subscriber, || err.into_response().status());
        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        (status, output)
    }

    #[test]
    fn test_failed_baseline_task_is_logged_as_api_error() {
        let (status, output) =
            respond_and_capture(ApiError::Internal("baseline task failed: panicked".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(output.contains("ERROR"), "internal failures log at error level: {output}");
        assert!(output.contains("source=API"), "expected API component tag: {output}");
        assert!(output.contains("baseline task failed"), "cause missing from log: {output}");
    }

    #[test]
    fn test_unknown_metric_is_logged_before_not_found() {
        let err = ApiError::Engine(EngineError::UnknownMetric("turbidity".to_string()));
        let (status, output) = respond_and_capture(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(output.contains("WARN"), "rejected requests log at warn level: {output}");
        assert!(output.contains("source=API"), "expected API component tag: {output}");
        assert!(output.contains("turbidity"), "rejected key missing from log: {output}");
    }

    #[test]
    fn test_store_outage_is_logged_under_api() {
        let err = ApiError::Upstream(StoreError::Unavailable("connection refused".to_string()));
        let (status, output) = respond_and_capture(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(output.contains("source=API"), "expected API component tag: {output}");
        assert!(output.contains("connection refused"), "cause missing from log: {output}");
    }
}
