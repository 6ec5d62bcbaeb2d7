use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};
use time::{
    macros::{date, format_description},
    Date, Duration,
};
use utoipa::ToSchema;

use crate::{
    db::{DateRange, Measurement, Station, TemperatureSummary},
    routes::Error,
    AppState,
};

/// Last day of the published dataset
pub const DEFAULT_REFERENCE_DATE: Date = date!(2017 - 08 - 23);
/// Station with the most observations in the dataset
pub const DEFAULT_ACTIVE_STATION: &str = "USC00519281";
/// Length of the lookback window ending at the reference date
pub const LOOKBACK_DAYS: i64 = 365;

/// Anchors for the one-year lookback queries
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateSettings {
    pub reference_date: Date,
    pub active_station: String,
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            reference_date: DEFAULT_REFERENCE_DATE,
            active_station: DEFAULT_ACTIVE_STATION.to_string(),
        }
    }
}

impl ClimateSettings {
    /// Inclusive lower bound of the lookback window
    pub fn window_start(&self) -> Date {
        self.reference_date
            .saturating_sub(Duration::days(LOOKBACK_DAYS))
    }
}

/// Date to precipitation; a date reported by several stations keeps the last row read
#[derive(Serialize, Debug, Default, PartialEq, ToSchema)]
#[serde(transparent)]
pub struct Precipitation(pub BTreeMap<String, Option<f64>>);

impl From<Vec<Measurement>> for Precipitation {
    fn from(rows: Vec<Measurement>) -> Self {
        Self(rows.into_iter().map(|row| (row.date, row.prcp)).collect())
    }
}

/// Station code to station name
#[derive(Serialize, Debug, Default, PartialEq, ToSchema)]
#[serde(transparent)]
pub struct StationNames(pub BTreeMap<String, String>);

impl From<Vec<Station>> for StationNames {
    fn from(rows: Vec<Station>) -> Self {
        Self(rows.into_iter().map(|row| (row.station, row.name)).collect())
    }
}

/// A single `{date: temperature}` object
#[derive(Serialize, Debug, PartialEq, ToSchema)]
#[serde(transparent)]
pub struct DatedTemperature(pub BTreeMap<String, f64>);

impl From<Measurement> for DatedTemperature {
    fn from(row: Measurement) -> Self {
        Self(BTreeMap::from([(row.date, row.tobs)]))
    }
}

/// Parses a `MMDDYYYY` path segment; anything but exactly eight digits is rejected
pub fn parse_path_date(value: &str) -> Result<Date, Error> {
    let invalid = || Error::InvalidDate {
        value: value.to_string(),
    };

    // the year component would otherwise accept a leading sign
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let format = format_description!("[month][day][year]");
    Date::parse(value, &format).map_err(|_| invalid())
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date for the year ending at the reference date", body = Precipitation),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Precipitation>, Error> {
    let rows = state
        .climate_db
        .precipitation_since(state.settings.window_start())
        .await?;

    Ok(Json(rows.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Station names keyed by station code", body = StationNames),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<StationNames>, Error> {
    let rows = state.climate_db.stations().await?;

    Ok(Json(rows.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station for the year ending at the reference date", body = Vec<DatedTemperature>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DatedTemperature>>, Error> {
    let rows = state
        .climate_db
        .temperature_observations(
            state.settings.active_station.clone(),
            state.settings.window_start(),
        )
        .await?;

    Ok(Json(rows.into_iter().map(DatedTemperature::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date included, as MMDDYYYY (e.g. 01012017)"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature on or after the start date", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Start date is not MMDDYYYY"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, Error> {
    let range = DateRange::starting(parse_path_date(&start)?);
    let summary = state.climate_db.temperature_summary(range).await?;

    Ok(Json(vec![summary]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date included, as MMDDYYYY (e.g. 01012017)"),
         ("end" = String, Path, description = "Last date included, as MMDDYYYY (e.g. 12312017)"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature between the two dates; all null when start is after end", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Start or end date is not MMDDYYYY"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read climate data")
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, Error> {
    let range = DateRange::between(parse_path_date(&start)?, parse_path_date(&end)?);
    let summary = state.climate_db.temperature_summary(range).await?;

    Ok(Json(vec![summary]))
}
