//! Configuration management for the screenshot puller.
//!
//! Loads configuration from an optional TOML file. Every section has
//! defaults, so a partial file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::errors::{PullError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub adb: AdbConfig,
    #[serde(default)]
    pub sdk: SdkConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdbConfig {
    /// Device bridge executable (looked up on PATH when not absolute)
    #[serde(default = "default_adb_binary")]
    pub binary: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Android SDK root, only needed to inspect application bundles
    #[serde(default)]
    pub android_sdk: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// HTML-to-image tool used for --generate-png
    #[serde(default = "default_rasterizer")]
    pub rasterizer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_adb_binary() -> PathBuf {
    PathBuf::from("adb")
}

fn default_rasterizer() -> String {
    "wkhtmltoimage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            binary: default_adb_binary(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rasterizer: default_rasterizer(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| PullError::Config(format!("{}: {}", path.display(), e)))
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
