//! Configuration loading for the bundled server binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Site identity used for document head assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name, used as the site header and `og:site_name`.
    pub name: String,
    /// Absolute base URL for canonical links, no trailing slash.
    pub base_url: String,
    /// Document language tag; `"en"` when unspecified.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Top-level configuration (`pageloom.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    /// Directory scanned for content files, relative to the config
    /// file unless absolute.
    #[serde(default = "default_routes_dir")]
    pub routes: PathBuf,
}

fn default_routes_dir() -> PathBuf {
    PathBuf::from("routes")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
