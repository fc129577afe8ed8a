/// Router tests driven in-process.
///
/// Requests go straight into the axum `Router` via `tower::ServiceExt`,
/// backed by the in-memory baseline store, so no socket or database is
/// needed.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use nirmal_dhara_service::config::AppConfig;
use nirmal_dhara_service::model::{BaselineReading, Metric};
use nirmal_dhara_service::server::{AppState, ROOT_MESSAGE, SharedStore, router, shared_store};
use nirmal_dhara_service::store::{BaselineStore, MemoryStore, StoreError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Store whose backend is always down.
struct UnreachableStore;

impl BaselineStore for UnreachableStore {
    fn find(&mut self, _location: &str) -> Result<Option<BaselineReading>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn insert_if_absent(&mut self, _baseline: &BaselineReading) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn app_with(store: SharedStore) -> Router {
    router(AppState::new(AppConfig::default(), store))
}

fn memory_app() -> (Router, SharedStore) {
    let store = shared_store(Box::new(MemoryStore::new()));
    (app_with(store.clone()), store)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("router should not fail");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("readable body");
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("response should be JSON");
    (status, json)
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_root_reports_running() {
    let (app, _) = memory_app();
    let (status, _, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), ROOT_MESSAGE);
}

#[tokio::test]
async fn test_user_analysis_data_has_all_metrics() {
    let (app, _) = memory_app();
    let (status, json) = get_json(app, "/api/user-analysis-data").await;
    assert_eq!(status, StatusCode::OK);

    for metric in Metric::ALL {
        let entry = &json[metric.key()];
        assert!(entry["title"].is_string(), "{metric} missing title");
        let bar = &entry["chartData"]["bar"];
        assert_eq!(bar["data"].as_array().map(Vec::len), Some(10), "{metric} bar data");
        assert_eq!(bar["labels"].as_array().map(Vec::len), Some(10), "{metric} bar labels");
        assert!(bar["label"].is_string());
        let pie = &entry["chartData"]["pie"];
        assert_eq!(pie["labels"], serde_json::json!(["Safe", "Warning", "Danger"]));
        assert_eq!(pie["data"].as_array().map(Vec::len), Some(3));
        assert_eq!(entry["predictions"].as_array().map(Vec::len), Some(3), "{metric} predictions");
    }
}

#[tokio::test]
async fn test_first_request_creates_default_baseline() {
    let (app, store) = memory_app();
    let (status, _) = get_json(app, "/api/user-analysis-data").await;
    assert_eq!(status, StatusCode::OK);

    let baseline = store
        .lock()
        .unwrap()
        .find("Varanasi")
        .unwrap()
        .expect("baseline created lazily on first request");
    assert_eq!(baseline.fecal_coliform, 500.0);
    assert_eq!(baseline.water_level, 70.5);
}

#[tokio::test]
async fn test_stored_baseline_drives_history() {
    let store = shared_store(Box::new(MemoryStore::new()));
    let now: DateTime<Utc> = Utc::now();
    let mut custom = BaselineReading::with_defaults("Varanasi", now);
    custom.flow = 100.0;
    store.lock().unwrap().insert_if_absent(&custom).unwrap();

    let (_, json) = get_json(app_with(store), "/api/user-analysis-data").await;
    for v in json["flow"]["chartData"]["bar"]["data"].as_array().unwrap() {
        let v = v.as_f64().unwrap();
        assert!((89.9..=110.1).contains(&v), "flow history {v} not around stored baseline 100");
    }
}

#[tokio::test]
async fn test_expert_endpoint_redirects_to_user_endpoint() {
    let (app, _) = memory_app();
    let (status, headers, _) = get(app, "/api/expert-analysis-data").await;
    assert!(status.is_redirection(), "expected redirect, got {status}");
    assert_eq!(headers[header::LOCATION], "/api/user-analysis-data");
}

#[tokio::test]
async fn test_river_segments_for_known_metric() {
    let (app, _) = memory_app();
    let (status, json) = get_json(app, "/api/river-segments/flow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metric"], "flow");
    // Default flow of 1400 with ±10% jitter never drops below the 1000 warning floor.
    assert_eq!(json["overallStatus"], "safe");
    let segments = json["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 7);
    assert_eq!(segments[0]["name"], "Assi Ghat");
}

#[tokio::test]
async fn test_river_segments_unknown_metric_is_not_found() {
    let (app, _) = memory_app();
    let (status, json) = get_json(app, "/api/river-segments/turbidity").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "Unknown metric: turbidity");
}

#[tokio::test]
async fn test_store_outage_is_generic_server_error() {
    let app = app_with(shared_store(Box::new(UnreachableStore)));
    let (status, json) = get_json(app, "/api/user-analysis-data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["msg"], "Server Error");
}
