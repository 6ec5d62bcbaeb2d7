use anyhow::anyhow;
use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use hawaii_climate_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_PORT, DEFAULT_DATABASE_PATH,
};
use log::LevelFilter;
use std::env;
use time::{
    format_description::well_known::Iso8601, macros::format_description, Date, OffsetDateTime,
};

use crate::{ClimateSettings, DEFAULT_ACTIVE_STATION, DEFAULT_REFERENCE_DATE};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Hawaii Climate API - read-only precipitation and temperature queries"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $HAWAII_CLIMATE_CONFIG, ./climate.toml,
    /// $XDG_CONFIG_HOME/hawaii-climate/climate.toml, /etc/hawaii-climate/climate.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "HAWAII_CLIMATE_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "HAWAII_CLIMATE_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "HAWAII_CLIMATE_PORT")]
    pub port: Option<String>,

    /// Public URL used in links on the home page
    #[arg(short, long, env = "HAWAII_CLIMATE_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// SQLite file holding the measurement and station tables
    #[arg(long, env = "HAWAII_CLIMATE_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Last day of the lookback window (YYYY-MM-DD), config file only
    #[arg(skip)]
    pub reference_date: Option<String>,

    /// Station used for /api/v1.0/tobs, config file only
    #[arg(skip)]
    pub active_station: Option<String>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn remote_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host(), self.port()))
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    pub fn climate_settings(&self) -> anyhow::Result<ClimateSettings> {
        let reference_date = match &self.reference_date {
            Some(raw) => Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .map_err(|e| anyhow!("invalid reference_date '{}': {}", raw, e))?,
            None => DEFAULT_REFERENCE_DATE,
        };

        Ok(ClimateSettings {
            reference_date,
            active_station: self
                .active_station
                .clone()
                .unwrap_or_else(|| DEFAULT_ACTIVE_STATION.to_string()),
        })
    }
}

/// Load configuration from CLI args, config file, and environment
///
/// Returns the config source as well so it can be logged once the logger is up.
pub fn get_config_info() -> anyhow::Result<(Cli, ConfigSource)> {
    resolve_config(Cli::parse())
}

fn resolve_config(cli_args: Cli) -> anyhow::Result<(Cli, ConfigSource)> {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("HAWAII_CLIMATE_CONFIG", "climate.toml")
    };

    let file_config: Cli = load_config(&source)?;

    Ok((merge_config(cli_args, file_config), source))
}

/// CLI args override file config (env vars are handled by clap)
fn merge_config(cli_args: Cli, file_config: Cli) -> Cli {
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        domain: cli_args.domain.or(file_config.domain),
        port: cli_args.port.or(file_config.port),
        remote_url: cli_args.remote_url.or(file_config.remote_url),
        database: cli_args.database.or(file_config.database),
        reference_date: file_config.reference_date,
        active_station: file_config.active_station,
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    parse_level(&level_str)
}

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
