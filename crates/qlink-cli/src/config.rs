//! Configuration for the qlink CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file (`--config`, or `~/.qlink/config.yaml` when present)
//! 2. Environment variables (with `QLINK_` prefix)
//! 3. Command-line flags (applied by `main`)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::path::{Path, PathBuf};

use qlink_bridge::DEFAULT_MAX_QUBITS;
use qlink_client::ExchangeConfig;
use serde::{Deserialize, Serialize};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Serial port settings
    #[serde(default)]
    pub serial: SerialConfig,

    /// Request/response timing
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Host bridge settings (`qlink serve`)
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Serial port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path; auto-detected when unset
    #[serde(default)]
    pub port: Option<String>,

    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Per-read timeout; a line stalled this long is returned as received
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

/// Host bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Largest qubit count a job may request
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Refuse `start_real_ibm_job` until a token is configured
    #[serde(default)]
    pub require_token: bool,

    /// Where to persist the IBM token (defaults to `~/.qlink/ibm_token.json`)
    #[serde(default)]
    pub token_path: Option<PathBuf>,

    /// Keep the token in memory only
    #[serde(default)]
    pub ephemeral_token: bool,
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_read_timeout_ms() -> u64 {
    1000
}

fn default_max_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
            require_token: false,
            token_path: None,
            ephemeral_token: false,
        }
    }
}

impl LinkConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let config: LinkConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from `config_file`, else the default file if it exists
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file.map(Path::to_path_buf).or_else(existing_default_path) {
            Some(path) => Self::from_file(path)?,
            None => LinkConfig::default(),
        };

        let config = config.merge_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Only variables that are set (and parse) override the current values.
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Serial
        if let Some(v) = lookup("QLINK_PORT") {
            self.serial.port = Some(v);
        }
        if let Some(v) = lookup("QLINK_BAUD_RATE").and_then(|v| v.parse().ok()) {
            self.serial.baud_rate = v;
        }
        if let Some(v) = lookup("QLINK_READ_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.serial.read_timeout_ms = v;
        }

        // Exchange
        if let Some(v) = lookup("QLINK_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.exchange.timeout_ms = v;
        }
        if let Some(v) = lookup("QLINK_POLL_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.exchange.poll_interval_ms = v;
        }

        // Bridge
        if let Some(v) = lookup("QLINK_MAX_QUBITS").and_then(|v| v.parse().ok()) {
            self.bridge.max_qubits = v;
        }
        if let Some(v) = lookup("QLINK_REQUIRE_TOKEN").and_then(|v| v.parse().ok()) {
            self.bridge.require_token = v;
        }
        if let Some(v) = lookup("QLINK_TOKEN_PATH") {
            self.bridge.token_path = Some(PathBuf::from(v));
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::ValidationError(
                "serial.baud_rate must be greater than 0".to_string(),
            ));
        }
        if self.exchange.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "exchange.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.exchange.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "exchange.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.exchange.poll_interval_ms > self.exchange.timeout_ms {
            return Err(ConfigError::ValidationError(format!(
                "exchange.poll_interval_ms ({}) exceeds exchange.timeout_ms ({})",
                self.exchange.poll_interval_ms, self.exchange.timeout_ms
            )));
        }
        if matches!(self.serial.port.as_deref(), Some("")) {
            return Err(ConfigError::ValidationError(
                "serial.port must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default configuration file: `~/.qlink/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qlink").join("config.yaml"))
}

fn existing_default_path() -> Option<PathBuf> {
    default_config_path().filter(|path| path.exists())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
