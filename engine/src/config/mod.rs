//! Configuration management
//!
//! This module handles loading, validation, and management of the testbench
//! configuration. Configuration is stored in TOML format at
//! ~/.bci-testbench/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **simulator**: UDP destination and broadcast frequency
//! - **relay**: Bind address, port, expiry window, sweep interval
//! - **client**: Relay URL used by `relay send` / `relay poll`
//!
//! Every section is optional; missing sections and fields take their
//! defaults. Command-line flags override file values.
//!
//! # Examples
//!
//! ```no_run
//! use bci_testbench::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Simulator target: {}:{}", config.simulator.host, config.simulator.port);
//! # Ok(())
//! # }
//! ```

use command_relay::RelayConfig;
use sdk::errors::BenchError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Signal simulator settings
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Command relay settings
    #[serde(default)]
    pub relay: RelaySettings,

    /// Relay client settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Signal simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Orchestrator host receiving the datagrams
    #[serde(default = "default_simulator_host")]
    pub host: String,

    /// Orchestrator UDP port
    #[serde(default = "default_simulator_port")]
    pub port: u16,

    /// Continuous broadcast frequency (Hz)
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f64,
}

/// Command relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Interface to listen on
    #[serde(default = "default_relay_bind")]
    pub bind: IpAddr,

    /// HTTP port
    #[serde(default = "default_relay_port")]
    pub port: u16,

    /// Milliseconds before an unread command is cleared
    #[serde(default = "default_expiry_ms")]
    pub expiry_ms: u64,

    /// Milliseconds between sweeps
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

/// Relay client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Full URL of the relay's command endpoint
    #[serde(default = "default_client_url")]
    pub url: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_simulator_host() -> String {
    "127.0.0.1".to_string()
}

fn default_simulator_port() -> u16 {
    7400
}

fn default_frequency_hz() -> f64 {
    10.0
}

fn default_relay_bind() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_relay_port() -> u16 {
    8080
}

fn default_expiry_ms() -> u64 {
    2000
}

fn default_sweep_interval_ms() -> u64 {
    500
}

fn default_client_url() -> String {
    "http://localhost:8080/command".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: default_simulator_host(),
            port: default_simulator_port(),
            frequency_hz: default_frequency_hz(),
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            bind: default_relay_bind(),
            port: default_relay_port(),
            expiry_ms: default_expiry_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_client_url(),
        }
    }
}

impl RelaySettings {
    /// Convert to the relay crate's runtime configuration
    pub fn to_relay_config(&self) -> RelayConfig {
        RelayConfig {
            bind: self.bind,
            port: self.port,
            expiry: Duration::from_millis(self.expiry_ms),
            sweep_interval: Duration::from_millis(self.sweep_interval_ms),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    /// (~/.bci-testbench/config.toml)
    ///
    /// If the configuration file doesn't exist, writes the defaults there
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The home directory cannot be determined
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, BenchError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails.
    pub fn load_from_path(path: &Path) -> Result<Self, BenchError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BenchError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, BenchError> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| BenchError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration to `path` and return it
    fn create_default(path: &Path) -> Result<Self, BenchError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BenchError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();
        config.save_to_path(path)?;

        tracing::info!("Created default configuration at {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to `path`
    pub fn save_to_path(&self, path: &Path) -> Result<(), BenchError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| BenchError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| BenchError::Config(format!("Failed to write config file: {}", e)))
    }

    /// Get the default configuration file path (~/.bci-testbench/config.toml)
    pub fn default_config_path() -> Result<PathBuf, BenchError> {
        let home = dirs::home_dir()
            .ok_or_else(|| BenchError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".bci-testbench").join("config.toml"))
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The log level is unknown
    /// - A port is zero
    /// - The broadcast frequency is not a positive finite number
    /// - The expiry window or sweep interval is zero
    /// - The client URL is not http(s)
    pub fn validate(&self) -> Result<(), BenchError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(BenchError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.simulator.host.trim().is_empty() {
            return Err(BenchError::Config(
                "simulator.host must not be empty".to_string(),
            ));
        }

        if self.simulator.port == 0 {
            return Err(BenchError::Config(
                "simulator.port must be non-zero".to_string(),
            ));
        }

        if !self.simulator.frequency_hz.is_finite() || self.simulator.frequency_hz <= 0.0 {
            return Err(BenchError::Config(
                "simulator.frequency_hz must be a positive number".to_string(),
            ));
        }

        if self.relay.port == 0 {
            return Err(BenchError::Config("relay.port must be non-zero".to_string()));
        }

        if self.relay.expiry_ms == 0 || self.relay.sweep_interval_ms == 0 {
            return Err(BenchError::Config(
                "relay.expiry_ms and relay.sweep_interval_ms must be non-zero".to_string(),
            ));
        }

        if !(self.client.url.starts_with("http://") || self.client.url.starts_with("https://")) {
            return Err(BenchError::Config(format!(
                "client.url must start with http:// or https://, got '{}'",
                self.client.url
            )));
        }

        Ok(())
    }
}
