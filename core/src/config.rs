//! Configuration for the todo client.
//!
//! Loaded from `todolist.toml` in the working directory or
//! `<config dir>/todolist/config.toml`; every field has a default so a
//! partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transport::DEFAULT_TIMEOUT;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "TODOLIST_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// Where the theme choice is persisted. Defaults to the platform data dir.
    pub storage_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ThemeConfig {
    pub fn resolved_storage_path(&self) -> Option<PathBuf> {
        self.storage_path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("todolist").join("theme.json")))
    }
}

impl Config {
    /// Load from the first config file found (or defaults), then apply
    /// environment overrides and validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(Self::find_config_file().as_deref(), std::env::var(API_URL_ENV).ok())
    }

    fn load_layered(path: Option<&Path>, api_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };
        config.apply_api_url_override(api_url);
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from("todolist.toml");
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("todolist").join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Blank values are ignored.
    pub fn apply_api_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url cannot be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
