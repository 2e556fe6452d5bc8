use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bundle: BundleConfig,
    pub api: ApiConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub path: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        BundleConfig {
            path: PathBuf::from("data/sample_bundle.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Tunables for the derived views.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_reports: usize,             // medical reports kept in the health summary
    pub plan_active_window_days: u32,   // treatment plans newer than this are active
    pub plan_medication_limit: usize,   // active medications attached per plan
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            max_reports: 20,
            plan_active_window_days: 90,
            plan_medication_limit: 3,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(raw: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(raw)
}
