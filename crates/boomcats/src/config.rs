//! Server configuration, loadable from a JSON file.

use std::path::Path;

use boomcats_room::RoomConfig;
use boomcats_session::SessionConfig;
use serde::{Deserialize, Serialize};

/// Errors loading a [`ServerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the server needs to start.
///
/// Every field has a default, so a config file only lists what it
/// changes:
///
/// ```json
/// { "bind_addr": "0.0.0.0:9000", "room": { "win_delay_ms": 3000 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    pub session: SessionConfig,
    pub room: RoomConfig,
}

impl ServerConfig {
    /// Parses a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            session: SessionConfig::default(),
            room: RoomConfig::default(),
        }
    }
}
