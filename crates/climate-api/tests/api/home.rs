use crate::helpers::{capture_logs, get, logged, spawn_app, MockClimateAccess};
use axum::http::StatusCode;
use std::sync::Arc;

#[tokio::test]
async fn home_lists_available_routes() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;
    let (status, html) = get(&test_app.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Welcome to Hawaii Climate Analysis Homepage"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains("/api/v1.0/{start}/{end}"));
}

#[tokio::test]
async fn docs_are_served() {
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;
    let (status, _) = get(&test_app.app, "/docs").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn docs_requests_are_logged() {
    capture_logs();
    let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;

    let (status, _) = get(&test_app.app, "/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(logged("http_request: new request, GET /docs"));
    assert!(logged("http_response: response, code: 200, path: /docs"));
}
