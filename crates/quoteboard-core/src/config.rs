//! Runtime configuration.
//!
//! Read from `<data_dir>/config.json` (camelCase keys). Every field is
//! optional in the file; a missing file means all defaults.
//!
//! ```json
//! {
//!   "pollIntervalSecs": 300,
//!   "remoteLatencyMs": 500,
//!   "httpHost": "127.0.0.1",
//!   "httpPort": 7878
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteboardConfig {
    /// Seconds between scheduled Pulls.
    pub poll_interval_secs: u64,
    /// Simulated round trip to the remote, in milliseconds.
    pub remote_latency_ms: u64,
    pub http_host: String,
    pub http_port: u16,
}

impl Default for QuoteboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            remote_latency_ms: 500,
            http_host: "127.0.0.1".to_string(),
            http_port: 7878,
        }
    }
}

impl QuoteboardConfig {
    /// Load `config.json` from a data directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::load(&dir.join(CONFIG_FILE_NAME))
    }

    /// Load a config file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating the directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "pollIntervalSecs must be at least 1".to_string(),
            ));
        }
        if self.http_host.trim().is_empty() {
            return Err(ConfigError::Invalid("httpHost must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn remote_latency(&self) -> Duration {
        Duration::from_millis(self.remote_latency_ms)
    }
}
