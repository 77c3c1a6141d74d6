//! Client configuration loaded from TOML.

use caro_game::GameMode;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Environment variable overriding the configured server URL.
pub const SERVER_URL_ENV: &str = "CARO_SERVER_URL";

/// Settings for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// File receiving tracing output while the TUI owns the terminal.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Input poll interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    tick_ms: u64,

    /// Mode to start immediately, skipping the menu.
    #[serde(default)]
    default_mode: Option<GameMode>,
}

#[instrument]
fn default_server_url() -> String {
    "ws://localhost:8080/ws".to_string()
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("caro_client.log")
}

#[instrument]
fn default_tick_ms() -> u64 {
    50
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            log_file: default_log_file(),
            tick_ms: default_tick_ms(),
            default_mode: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.tick_ms == 0 {
            return Err(ConfigError::new("tick_ms must be positive".to_string()));
        }

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise defaults, then applies the
    /// `CARO_SERVER_URL` environment override.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        Ok(config.with_server_url(std::env::var(SERVER_URL_ENV).ok()))
    }

    /// Replaces the server URL when `url` is set.
    pub fn with_server_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            debug!(%url, "Overriding server URL");
            self.server_url = url;
        }
        self
    }

    /// Replaces the log file when `path` is set.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.log_file = path;
        }
        self
    }

    /// Replaces the startup mode when `mode` is set.
    pub fn with_default_mode(mut self, mode: Option<GameMode>) -> Self {
        if mode.is_some() {
            self.default_mode = mode;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
