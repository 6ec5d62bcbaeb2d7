use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use time::Date;

use super::{iso_date, ClimateData, DateRange, Error, Measurement, Station, TemperatureSummary};

const REQUIRED_TABLES: [&str; 2] = ["measurement", "station"];

/// Read-only pooled access to the climate SQLite file.
///
/// Each query checks a connection out of the pool for its own duration, so
/// concurrent requests never share a session and a failed query cannot leave
/// a closed handle behind for the next request.
#[derive(Clone)]
pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    pub async fn new(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true)
            .pragma("busy_timeout", "5000");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("SQLite climate database opened read-only at: {}", path);
        Ok(Self { pool })
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation_since(&self, since: Date) -> Result<Vec<Measurement>, Error> {
        let since = iso_date(since)?;
        debug!("querying precipitation since {}", since);

        let rows = sqlx::query_as::<_, Measurement>(
            "SELECT station, date, prcp, tobs
             FROM measurement
             WHERE date >= ?",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let rows = sqlx::query_as::<_, Station>(
            "SELECT station, name, latitude, longitude, elevation FROM station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn temperature_observations(
        &self,
        station: String,
        since: Date,
    ) -> Result<Vec<Measurement>, Error> {
        let since = iso_date(since)?;
        debug!("querying temperature observations for {} since {}", station, since);

        let rows = sqlx::query_as::<_, Measurement>(
            "SELECT station, date, prcp, tobs
             FROM measurement
             WHERE station = ? AND date >= ?",
        )
        .bind(station)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn temperature_summary(&self, range: DateRange) -> Result<TemperatureSummary, Error> {
        let start = iso_date(range.start)?;
        let end = range.end.map(iso_date).transpose()?;
        debug!("querying temperature summary for {} to {:?}", start, end);

        // aggregates over zero rows come back as a single row of NULLs
        let summary = sqlx::query_as::<_, TemperatureSummary>(
            "SELECT CAST(MIN(tobs) AS REAL) AS minimum,
                    CAST(MAX(tobs) AS REAL) AS maximum,
                    AVG(tobs) AS average
             FROM measurement
             WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;

        for table in REQUIRED_TABLES {
            let found: Option<String> = sqlx::query_scalar(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_optional(&self.pool)
            .await?;

            if found.is_none() {
                return Err(Error::MissingTable(table.to_string()));
            }
        }

        Ok(())
    }
}
