pub mod db;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use db::{ClimateAccess, ClimateData, DateRange, Measurement, Station, TemperatureSummary};
pub use routes::{
    climate::{
        parse_path_date, precipitation, stations, temperature_between, temperature_from, tobs,
        ClimateSettings, DatedTemperature, Precipitation, StationNames, DEFAULT_ACTIVE_STATION,
        DEFAULT_REFERENCE_DATE, LOOKBACK_DAYS,
    },
    home::index_handler,
    Error,
};
pub use startup::*;
pub use utils::*;
