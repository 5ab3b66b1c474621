//! JSON configuration file for the PTT relay.
//!
//! The file is written by the setup wizard and read once at startup:
//!
//! ```json
//! {
//!   "ptt_key": "caps_lock",
//!   "http_port": 8080,
//!   "ws_port": 8765
//! }
//! ```
//!
//! Every field is optional and falls back to its default when absent.
//! Unknown fields are ignored so older binaries can read newer files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::{ConfigurationError, KeyIdentifier};

/// File name the server looks for in its working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON content could not be parsed.
    #[error("failed to parse config JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The config could not be serialized to JSON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A port field is zero.
    #[error("{field} must be between 1 and 65535")]
    InvalidPort { field: &'static str },

    /// Both servers were given the same port.
    #[error("http_port and ws_port must differ (both are {0})")]
    DuplicatePorts(u16),

    /// The `ptt_key` field does not name a known key.
    #[error(transparent)]
    Key(#[from] ConfigurationError),
}

/// On-disk configuration record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PttConfig {
    /// Key identifier, e.g. `"caps_lock"` or `"f13"`.
    #[serde(default = "default_ptt_key")]
    pub ptt_key: String,
    /// Port of the static page server.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Port of the WebSocket control channel.
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,
}

fn default_ptt_key() -> String {
    "caps_lock".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_ws_port() -> u16 {
    8765
}

impl Default for PttConfig {
    fn default() -> Self {
        Self {
            ptt_key: default_ptt_key(),
            http_port: default_http_port(),
            ws_port: default_ws_port(),
        }
    }
}

impl PttConfig {
    /// Loads the config from `path`, returning [`PttConfig::default()`] if the
    /// file does not exist.
    ///
    /// The result is not validated; call [`PttConfig::validate`] before use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not found",
    /// and [`ConfigError::Parse`] if the JSON is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `text` is not a JSON object with
    /// fields of the right types.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Writes the config to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system failures or
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        content.push('\n');
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the ports and resolves the key.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPort`] if either port is 0.
    /// - [`ConfigError::DuplicatePorts`] if both ports are equal.
    /// - [`ConfigError::Key`] if `ptt_key` is not a known key name.
    pub fn validate(&self) -> Result<KeyIdentifier, ConfigError> {
        if self.http_port == 0 {
            return Err(ConfigError::InvalidPort { field: "http_port" });
        }
        if self.ws_port == 0 {
            return Err(ConfigError::InvalidPort { field: "ws_port" });
        }
        if self.http_port == self.ws_port {
            return Err(ConfigError::DuplicatePorts(self.http_port));
        }
        Ok(KeyIdentifier::parse(&self.ptt_key)?)
    }
}
