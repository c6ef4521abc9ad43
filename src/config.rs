//! Configuration for the tasklist binary.
//!
//! Settings come from an optional YAML file, by default
//! `<config dir>/tasklist/config.yaml`. Every field is optional.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::store::StoreOptions;

/// File name used when no data file is configured
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Task file; relative paths resolve against the working directory
    pub data_file: PathBuf,

    /// Save through a temporary file plus rename
    pub atomic_writes: bool,

    /// One of error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            atomic_writes: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklist").join("config.yaml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).wrap_err_with(|| format!("Failed to read config file {}", path.display())),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            atomic_writes: self.atomic_writes,
        }
    }

    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| eyre::eyre!("Invalid log_level: {} (expected error, warn, info, debug or trace)", self.log_level))
    }
}
