use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::{env, time::Duration};
use surfsup_core::{find_config_file, load_config, ConfigSource, DEFAULT_DATABASE, DEFAULT_PORT};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::DatabaseSettings;

#[derive(Parser, Clone, Debug, serde::Deserialize, Default, PartialEq)]
#[command(
    author,
    version,
    about = "SurfsUp - read-only climate API over weather station observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $SURFSUP_CONFIG, ./surfsup.toml,
    /// $XDG_CONFIG_HOME/surfsup/surfsup.toml, /etc/surfsup/surfsup.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "SURFSUP_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(long, env = "SURFSUP_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SURFSUP_PORT")]
    pub port: Option<String>,

    /// Path to the SQLite climate dataset, opened read-only
    #[arg(short, long, env = "SURFSUP_DATABASE")]
    pub database: Option<String>,

    /// Name of the measurement table
    #[arg(long, env = "SURFSUP_MEASUREMENT_TABLE")]
    pub measurement_table: Option<String>,

    /// Name of the station table
    #[arg(long, env = "SURFSUP_STATION_TABLE")]
    pub station_table: Option<String>,

    /// Size of the read-only connection pool
    #[arg(long, env = "SURFSUP_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Per-query timeout in seconds
    #[arg(long, env = "SURFSUP_QUERY_TIMEOUT")]
    pub query_timeout: Option<u64>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }

    pub fn database_settings(&self) -> DatabaseSettings {
        DatabaseSettings {
            path: self
                .database
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            measurement_table: self
                .measurement_table
                .clone()
                .unwrap_or_else(|| "measurement".to_string()),
            station_table: self
                .station_table
                .clone()
                .unwrap_or_else(|| "station".to_string()),
            max_connections: self.max_connections.unwrap_or(5),
            query_timeout: Duration::from_secs(self.query_timeout.unwrap_or(10)),
        }
    }

    /// Fill every unset value from `file`; values already set win
    pub fn merge_file(self, file: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file.level),
            host: self.host.or(file.host),
            port: self.port.or(file.port),
            database: self.database.or(file.database),
            measurement_table: self.measurement_table.or(file.measurement_table),
            station_table: self.station_table.or(file.station_table),
            max_connections: self.max_connections.or(file.max_connections),
            query_timeout: self.query_timeout.or(file.query_timeout),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> anyhow::Result<Cli> {
    let cli_args = Cli::parse();

    let source = match cli_args.config {
        Some(ref path) => ConfigSource::Explicit(path.into()),
        None => find_config_file("SURFSUP_CONFIG", "surfsup.toml"),
    };
    let file_config: Cli = load_config(&source)?;

    log::info!("Loaded config from: {}", source);
    Ok(cli_args.merge_file(file_config))
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    level_str.parse().unwrap_or(LevelFilter::Info)
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
            let now = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                now,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
