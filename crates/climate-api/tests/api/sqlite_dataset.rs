use crate::helpers::{get_json, spawn_dataset_app, spawn_dataset_app_named};
use axum::http::StatusCode;
use climate_api::{build_app_state, ClimateSettings};
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::test]
async fn range_over_single_row_matches_its_temperature() {
    let dataset = spawn_dataset_app(&[("USC00519281", "2017-06-01", Some(0.0), 75.0)]).await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/01012017/12312017").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "Minimum temperature": 75.0,
            "Maximum temperature": 75.0,
            "Average temperature": 75.0,
        }])
    );
}

#[tokio::test]
async fn range_with_start_after_end_is_null_aggregate() {
    let dataset = spawn_dataset_app(&[("USC00519281", "2017-06-01", Some(0.0), 75.0)]).await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/12312017/01012017").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "Minimum temperature": null,
            "Maximum temperature": null,
            "Average temperature": null,
        }])
    );
}

#[tokio::test]
async fn range_bounds_are_inclusive() {
    let dataset = spawn_dataset_app(&[
        ("USC00519397", "2016-12-31", None, 60.0),
        ("USC00519397", "2017-01-01", None, 70.0),
        ("USC00513117", "2017-01-02", None, 72.0),
        ("USC00513117", "2017-01-03", None, 90.0),
    ])
    .await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/01012017/01022017").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Minimum temperature"], 70.0);
    assert_eq!(body[0]["Maximum temperature"], 72.0);
    assert_eq!(body[0]["Average temperature"], 71.0);
}

#[tokio::test]
async fn start_route_aggregates_every_station() {
    let dataset = spawn_dataset_app(&[
        ("USC00519397", "2016-12-31", None, 50.0),
        ("USC00519397", "2017-08-01", None, 70.0),
        ("USC00513117", "2017-08-02", None, 80.0),
        ("USC00519281", "2017-08-23", None, 78.0),
    ])
    .await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/01012017").await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["Minimum temperature"], 70.0);
    assert_eq!(results[0]["Maximum temperature"], 80.0);
    assert_eq!(results[0]["Average temperature"], 76.0);
}

#[tokio::test]
async fn precipitation_only_includes_lookback_window() {
    let dataset = spawn_dataset_app(&[
        ("USC00519397", "2016-08-22", Some(0.5), 80.0),
        ("USC00519397", "2016-08-23", Some(0.0), 81.0),
        ("USC00513117", "2017-08-23", None, 82.0),
    ])
    .await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"2016-08-23": 0.0, "2017-08-23": null}));
}

#[tokio::test]
async fn tobs_only_includes_active_station() {
    let dataset = spawn_dataset_app(&[
        ("USC00519281", "2016-08-18", None, 80.0),
        ("USC00519281", "2016-08-24", Some(2.15), 77.0),
        ("USC00519397", "2016-08-24", Some(0.08), 79.0),
        ("USC00519281", "2016-08-25", Some(0.06), 80.0),
    ])
    .await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"2016-08-24": 77.0}, {"2016-08-25": 80.0}]));
}

#[tokio::test]
async fn stations_lists_every_station_once() {
    let dataset = spawn_dataset_app(&[]).await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    let stations = body.as_object().unwrap();
    assert_eq!(stations.len(), 3);
    assert_eq!(stations["USC00519281"], "WAIHEE 837.5, HI US");
}

#[tokio::test]
async fn repeated_requests_reuse_the_pool() {
    let dataset = spawn_dataset_app(&[("USC00519281", "2017-06-01", Some(0.0), 75.0)]).await;

    for _ in 0..20 {
        let (status, _) = get_json(&dataset.app, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = get_json(&dataset.app, "/api/v1.0/01012017").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_database_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite");

    let result = build_app_state(
        "http://127.0.0.1:9800".to_string(),
        path.to_str().unwrap().to_string(),
        ClimateSettings::default(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn concurrent_requests_each_get_a_connection() {
    let dataset = spawn_dataset_app(&[
        ("USC00519281", "2017-06-01", Some(0.0), 75.0),
        ("USC00519281", "2017-06-02", Some(0.1), 77.0),
    ])
    .await;

    let requests = (0..16).map(|i| {
        let uri = if i % 2 == 0 {
            "/api/v1.0/06012017/06022017"
        } else {
            "/api/v1.0/precipitation"
        };
        get_json(&dataset.app, uri)
    });

    for (status, _) in futures::future::join_all(requests).await {
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn database_without_station_table_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.sqlite");
    let path = path.to_str().unwrap().to_string();

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT)")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let result = build_app_state(
        "http://127.0.0.1:9800".to_string(),
        path,
        ClimateSettings::default(),
    )
    .await;

    let err = result.err().unwrap();
    assert!(err.to_string().contains("station"), "{err}");
}

#[tokio::test]
async fn database_path_with_url_characters_is_opened_as_a_file() {
    let dataset = spawn_dataset_app_named(
        "hawaii#2017?mode=rw.sqlite",
        &[("USC00519281", "2017-06-01", None, 75.0)],
    )
    .await;

    let (status, body) = get_json(&dataset.app, "/api/v1.0/01012017").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["Minimum temperature"], 75.0);
}
