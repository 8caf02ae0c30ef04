//! SurfsUp Core Library
//!
//! Config file discovery and the defaults shared by the API server.

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for config paths
pub const APP_NAME: &str = "surfsup";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the climate dataset
pub const DEFAULT_DATABASE: &str = "./Resources/hawaii.sqlite";
