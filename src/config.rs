//! Bufview Configuration
//!
//! Handles parsing and management of bufview.toml configuration files, plus the
//! process-wide configuration consulted by buffer allocation and typed views.

use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Name of the configuration file searched for by [`BufferConfig::find_and_load`].
pub const CONFIG_FILE_NAME: &str = "bufview.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

static GLOBAL: OnceCell<BufferConfig> = OnceCell::new();
static DEFAULT: Lazy<BufferConfig> = Lazy::new(BufferConfig::default);

/// Root configuration structure matching bufview.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BufferConfig {
    /// Allocation limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Typed view storage layout
    #[serde(default)]
    pub views: ViewsConfig,

    /// Logging knobs
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

impl BufferConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: BufferConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.limits.max_byte_length == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_byte_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Allocation limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Buffer lengths at or above this value are rejected
    #[serde(default = "default_max_byte_length")]
    pub max_byte_length: usize,
}

fn default_max_byte_length() -> usize {
    i32::MAX as usize
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_byte_length: default_max_byte_length(),
        }
    }
}

/// Typed view settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewsConfig {
    /// Element byte order of typed views (DataView always takes it per call)
    #[serde(default)]
    pub little_endian: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Log allocations at info instead of debug
    #[serde(default)]
    pub log_allocations: bool,
}

/// Install the process-wide configuration. Only the first call succeeds.
///
/// Buffers and views created earlier were built under the defaults and keep them: a
/// typed view's byte order is fixed when it is constructed.
pub fn install(config: BufferConfig) -> ConfigResult<()> {
    config.validate()?;
    GLOBAL
        .set(config)
        .map_err(|_| ConfigError::Invalid("configuration already installed".to_string()))
}

/// The installed configuration, or the defaults when none is installed yet.
/// Reading it never blocks a later [`install`].
pub fn current() -> &'static BufferConfig {
    GLOBAL.get().unwrap_or(&*DEFAULT)
}
