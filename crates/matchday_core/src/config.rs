//! Runtime configuration.
//!
//! Resolution order: optional JSON file named by `MATCHDAY_CONFIG_PATH`, then
//! `MATCHDAY_DATA_DIR`, then the built-in default. Front ends may override
//! the result further (e.g. from a command line flag).

use crate::store::NamespaceStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "MATCHDAY_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "MATCHDAY_DATA_DIR";
pub const DEFAULT_DATA_ROOT: &str = "data/events";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file from MATCHDAY_CONFIG_PATH='{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON from MATCHDAY_CONFIG_PATH='{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: data_root is empty")]
    EmptyDataRoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one sub-directory per event
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
}

fn default_data_root() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_ROOT)
}

impl Default for Config {
    fn default() -> Self {
        Self { data_root: default_data_root() }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match non_empty(lookup(CONFIG_PATH_ENV)) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(dir) = non_empty(lookup(DATA_DIR_ENV)) {
            config.data_root = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: display, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataRoot);
        }
        Ok(())
    }

    /// Filesystem store rooted at `data_root`.
    pub fn open_store(&self) -> NamespaceStore {
        log::debug!("Using data root {:?}", self.data_root);
        NamespaceStore::new(&self.data_root)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
