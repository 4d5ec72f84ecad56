//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig;
use crate::sensor::SensorClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sensor API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_data_path")]
    pub data_path: String,

    #[serde(default = "default_devices_path")]
    pub devices_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_data_path() -> String {
    "/data".to_string()
}

fn default_devices_path() -> String {
    "/devices".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_path: default_data_path(),
            devices_path: default_devices_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SourceConfig {
    pub fn client_config(&self) -> SensorClientConfig {
        SensorClientConfig {
            base_url: self.base_url.clone(),
            data_path: self.data_path.clone(),
            devices_path: self.devices_path.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }
}

/// Dashboard refresh configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    600 // 10 minutes
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl DashboardConfig {
    /// Poll and page reload interval, never below one second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("airwatch").join("config.toml")),
            Some(PathBuf::from("/etc/airwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source overrides
        if let Some(url) = lookup("AIRWATCH_SOURCE_URL") {
            self.source.base_url = url;
        }
        if let Some(path) = lookup("AIRWATCH_DATA_PATH") {
            self.source.data_path = path;
        }
        if let Some(path) = lookup("AIRWATCH_DEVICES_PATH") {
            self.source.devices_path = path;
        }

        // Dashboard overrides
        if let Some(secs) = lookup("AIRWATCH_REFRESH_SECS").and_then(|s| s.parse().ok()) {
            self.dashboard.refresh_interval_secs = secs;
        }

        // Server overrides
        if let Some(host) = lookup("AIRWATCH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("AIRWATCH_PORT").and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("AIRWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AIRWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Server settings for the API layer
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            cors_origins: self.server.cors_origins.clone(),
            refresh_interval_secs: self.dashboard.refresh_interval().as_secs(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Airwatch Configuration
#
# Environment variables override these settings:
# - AIRWATCH_SOURCE_URL
# - AIRWATCH_DATA_PATH
# - AIRWATCH_DEVICES_PATH
# - AIRWATCH_REFRESH_SECS
# - AIRWATCH_HOST
# - AIRWATCH_PORT
# - AIRWATCH_LOG_LEVEL
# - AIRWATCH_LOG_FORMAT

[source]
# Sensor API base URL
base_url = "http://127.0.0.1:5000"

# Readings endpoint
data_path = "/data"

# Device list endpoint
devices_path = "/devices"

# Request timeout in seconds
request_timeout_secs = 10

[dashboard]
# How often to poll the sensor API and reload the page (seconds)
refresh_interval_secs = 600

[server]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8501

# Allowed CORS origins (empty = permissive)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
