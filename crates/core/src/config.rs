//! Config file discovery and loading
//!
//! Values are layered in this order, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables (handled by clap)
//! 3. TOML config file
//! 4. Built-in defaults

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the active config file was found
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Passed via `--config` or the config env var
    Explicit(PathBuf),
    /// Working directory
    Local(PathBuf),
    /// `$XDG_CONFIG_HOME/surfsup/` or `~/.config/surfsup/`
    User(PathBuf),
    /// `/etc/surfsup/`
    System(PathBuf),
    /// No file, built-in defaults only
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::Local(p)
            | ConfigSource::User(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Locate a config file named `filename`.
///
/// An explicit path in `env_var` wins when it exists, then the working
/// directory, the user config dir and finally `/etc/surfsup/`.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Ok(path) = env::var(env_var) {
        let p = PathBuf::from(path);
        if p.exists() {
            return ConfigSource::Explicit(p);
        }
        debug!("{} points at missing file {}, ignoring", env_var, p.display());
    }

    let candidates = [
        ConfigSource::Local(PathBuf::from(filename)),
        ConfigSource::User(user_config_dir().join(filename)),
        ConfigSource::System(PathBuf::from("/etc").join(APP_NAME).join(filename)),
    ];

    candidates
        .into_iter()
        .find(|c| c.path().is_some_and(Path::exists))
        .unwrap_or(ConfigSource::Defaults)
}

fn user_config_dir() -> PathBuf {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_NAME)
    } else if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".config").join(APP_NAME)
    } else {
        PathBuf::from(".config").join(APP_NAME)
    }
}

/// Read and deserialize the TOML file behind `source`.
///
/// `ConfigSource::Defaults` yields `T::default()`.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
}
