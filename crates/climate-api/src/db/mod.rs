pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{macros::format_description, Date};
use utoipa::ToSchema;

pub use sqlite::ClimateAccess;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("Database is missing required table: {0}")]
    MissingTable(String),
}

/// Read access to the measurement and station tables.
///
/// Every call is an independent read; implementations must not keep
/// per-request state between calls.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// All measurements, across stations, dated on or after `since`
    async fn precipitation_since(&self, since: Date) -> Result<Vec<Measurement>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Measurements for a single station dated on or after `since`, in storage order
    async fn temperature_observations(
        &self,
        station: String,
        since: Date,
    ) -> Result<Vec<Measurement>, Error>;
    /// Min/max/avg of `tobs` over every station inside `range`
    async fn temperature_summary(&self, range: DateRange) -> Result<TemperatureSummary, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

/// One row of the `measurement` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Measurement {
    pub station: String,
    /// ISO date as stored in the dataset (YYYY-MM-DD)
    pub date: String,
    /// Precipitation in inches, missing on some days
    pub prcp: Option<f64>,
    /// Temperature observation in degrees Fahrenheit
    pub tobs: f64,
}

/// One row of the `station` table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Inclusive date bounds for an aggregate query; `end: None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn starting(start: Date) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Aggregates over `tobs`; every field is `None` when no rows matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Minimum temperature")]
    pub minimum: Option<f64>,
    #[serde(rename = "Maximum temperature")]
    pub maximum: Option<f64>,
    #[serde(rename = "Average temperature")]
    pub average: Option<f64>,
}

/// Formats a date the way the dataset stores it, so text comparison in SQL orders correctly
pub fn iso_date(date: Date) -> Result<String, Error> {
    let format = format_description!("[year]-[month]-[day]");
    Ok(date.format(&format)?)
}
