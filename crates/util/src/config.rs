//! JSON-backed configuration for the admin panel.
//!
//! The file lives at `ADMIN_PANEL_CONFIG` when set, otherwise at
//! `<config_dir>/admin-panel/config.json`. A missing file yields defaults.
//! Environment variables override the API section after the file is read.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::expand_tilde;

/// Overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "ADMIN_PANEL_CONFIG";
/// Overrides `api.base_url`.
pub const API_BASE_URL_ENV: &str = "ADMIN_API_BASE_URL";
/// Overrides `api.token`.
pub const API_TOKEN_ENV: &str = "ADMIN_API_TOKEN";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:7000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_DURATION_MS: u64 = 5_000;
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub api: ApiSection,
    pub navigation: NavigationSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSection {
    /// Window after a successful refresh during which new requests are cache hits.
    pub cache_duration_ms: u64,
    /// Quiet period before a requested refresh actually fetches.
    pub debounce_ms: u64,
    /// Drop top-level sections whose items were all filtered out.
    pub prune_empty_sections: bool,
    /// Alternate catalog file replacing the built-in menu.
    pub catalog_path: Option<PathBuf>,
}

impl Default for NavigationSection {
    fn default() -> Self {
        Self {
            cache_duration_ms: DEFAULT_CACHE_DURATION_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            prune_empty_sections: false,
            catalog_path: None,
        }
    }
}

impl PanelConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&default_config_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut config: PanelConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(catalog_path) = config.navigation.catalog_path.take() {
            config.navigation.catalog_path = Some(expand_tilde(&catalog_path.to_string_lossy()));
        }
        Ok(config)
    }

    /// Environment variables win over file values. Blank values are ignored.
    pub fn apply_env(&mut self) {
        if let Some(base_url) = non_empty_env(API_BASE_URL_ENV) {
            self.api.base_url = base_url;
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api.token = Some(token);
        }
    }
}

/// Resolved configuration file path.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("admin-panel")
        .join("config.json")
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
