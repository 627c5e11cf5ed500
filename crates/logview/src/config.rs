//! Configuration management for logview.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/logview/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use viewer::{ViewerOptions, DEFAULT_CHUNK_SIZE, DEFAULT_ITEMS_PER_PAGE, MAX_LINE_EXTENSION};

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("chunk_size must be greater than 0, got {0}")]
    InvalidChunkSize(u64),

    #[error("items_per_page must be greater than 0, got {0}")]
    InvalidItemsPerPage(usize),

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for logview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Log browsing configuration.
    pub viewer: ViewerConfig,

    /// Diagnostics for logview itself.
    pub logging: LoggingConfig,
}

/// Log browsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Root directory all browsing is confined to.
    pub log_dir: PathBuf,

    /// Whether the viewer may be used at all. Off unless explicitly enabled.
    pub enabled: bool,

    /// Page size in bytes for file pages (default: 100KB).
    pub chunk_size: u64,

    /// Maximum bytes read past a page end to complete a line.
    pub max_line_extension: u64,

    /// Entries per directory listing page.
    pub items_per_page: usize,
}

/// Diagnostics for logview itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("log"),
            enabled: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_line_extension: MAX_LINE_EXTENSION,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logview")
        .join("config.toml")
}

/// Parse a boolean environment value such as `1`, `true` or `off`.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - LOGVIEW_LOG_DIR: Override the log root
    /// - LOGVIEW_ENABLED: Enable or disable the viewer (1/0, true/false, on/off)
    /// - LOGVIEW_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("LOGVIEW_LOG_DIR") {
            if !dir.is_empty() {
                tracing::info!("Overriding log_dir from environment: {}", dir);
                self.viewer.log_dir = PathBuf::from(dir);
            }
        }

        if let Ok(enabled) = std::env::var("LOGVIEW_ENABLED") {
            match parse_bool(&enabled) {
                Some(value) => {
                    tracing::info!("Overriding enabled from environment: {}", value);
                    self.viewer.enabled = value;
                }
                None => tracing::warn!("Ignoring unrecognized LOGVIEW_ENABLED value: {}", enabled),
            }
        }

        if let Ok(level) = std::env::var("LOGVIEW_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.logging.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewer.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.viewer.chunk_size));
        }

        if self.viewer.items_per_page == 0 {
            return Err(ConfigError::InvalidItemsPerPage(self.viewer.items_per_page));
        }

        let level = self.logging.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(
                self.logging.log_level.clone(),
            ));
        }

        Ok(())
    }

    /// Options for the viewer core derived from this configuration.
    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            chunk_size: self.viewer.chunk_size,
            max_line_extension: self.viewer.max_line_extension,
            items_per_page: self.viewer.items_per_page,
        }
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
