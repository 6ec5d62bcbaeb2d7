use crate::{
    db::{ClimateAccess, ClimateData, TemperatureSummary},
    index_handler, precipitation, routes, stations, temperature_between, temperature_from, tobs,
    ClimateSettings, DatedTemperature, Precipitation, StationNames,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hawaii_climate_core::is_file;
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate_db: Arc<dyn ClimateData>,
    pub settings: ClimateSettings,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_from,
        routes::climate::climate_routes::temperature_between,
    ),
    components(
        schemas(
            Precipitation,
            StationNames,
            DatedTemperature,
            TemperatureSummary,
        )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database_path: String,
    settings: ClimateSettings,
) -> Result<AppState, anyhow::Error> {
    if !is_file(&database_path) {
        return Err(anyhow!("climate database not found at {}", database_path));
    }

    let climate_db = ClimateAccess::new(&database_path)
        .await
        .map_err(|e| anyhow!("error opening climate database {}: {}", database_path, e))?;

    climate_db
        .health_check()
        .await
        .map_err(|e| anyhow!("climate database {} is not usable: {}", database_path, e))?;

    Ok(AppState {
        remote_url,
        climate_db: Arc::new(climate_db),
        settings,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
