//! Configuration management for Stylecast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "STYLECAST_CONFIG";

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "STYLECAST_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_persona")]
    pub persona: String,
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    /// Backend LLM provider; the server default is used when unset
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default = "default_true")]
    pub animate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevealConfig {
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub directory: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_persona() -> String {
    "hitchens".to_string()
}

fn default_verbosity() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_cadence_ms() -> u64 {
    30
}

fn default_export_dir() -> String {
    "~/Pictures/stylecast".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            verbosity: default_verbosity(),
            provider: None,
            animate: true,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence_ms(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing config file is not an error: defaults are used. The
    /// `STYLECAST_API_URL` environment variable overrides `api.base_url`.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot constrain on its own
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        if !(1..=3).contains(&self.defaults.verbosity) {
            return Err(ConfigError::InvalidValue {
                field: "defaults.verbosity".to_string(),
                reason: "must be 1, 2 or 3".to_string(),
            }
            .into());
        }
        if self.reveal.cadence_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reveal.cadence_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Delay between reveal steps
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.reveal.cadence_ms)
    }

    /// Request timeout for backend calls
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Export directory with `~` expanded
    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.export.directory).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("stylecast").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("stylecast"))
}
