// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Configuration file types and parsing for logrelay.
//!
//! JSON5 configuration format supporting:
//! - a `logger` section (sink target, initial level word)
//! - a `collector` section (port, batch size, report interval)
//! - comments and trailing commas

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup configuration (JSON5 file format)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,

    #[serde(default)]
    pub collector: CollectorConfig,
}

/// Logger section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggerConfig {
    /// Sink target: file path or "socket:<host>:<port>"
    #[serde(default = "default_target")]
    pub target: String,

    /// Initial minimum level word. An invalid word yields level Unknown,
    /// which filters out all non-control records until a valid level is set.
    #[serde(default = "default_level")]
    pub level: String,
}

/// Collector section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectorConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Report after every N-th message (positive)
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    /// Report interval in seconds (positive); idle periods never report
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
}

fn default_target() -> String {
    "relay.log".to_string()
}

fn default_level() -> String {
    "Low".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_batch_size() -> u64 {
    10
}

fn default_report_interval() -> u64 {
    60
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            level: default_level(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            batch_size: default_batch_size(),
            report_interval: default_report_interval(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to a JSON5 string (with pretty formatting)
    pub fn to_json5(&self) -> String {
        // json5 crate has no pretty printing; serde_json output is valid
        // JSON5, while json5 handles comments and trailing commas on input
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5();
        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.collector.validate()
    }
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        Ok(())
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.report_interval == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    IoError(std::path::PathBuf, String),
    ParseError(String),
    EmptyTarget,
    InvalidPort(u16),
    ZeroBatchSize,
    ZeroReportInterval,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(f, "failed to read config file {}: {}", path.display(), msg)
            }
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::EmptyTarget => write!(f, "sink target cannot be empty"),
            ConfigError::InvalidPort(port) => write!(f, "invalid listening port: {}", port),
            ConfigError::ZeroBatchSize => write!(f, "batch size must be positive"),
            ConfigError::ZeroReportInterval => write!(f, "report interval must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}
