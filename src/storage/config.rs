//! Configuration handling for tick
//!
//! Settings are a flat trio (`editor`, `viewer`, `file`) stored in a single
//! file whose format follows its extension: `.json`, `.yml`/`.yaml`, or
//! `.toml`. The default location is `config.toml` in the platform config
//! directory; `--config` or `$TICK_CONFIG` override it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported config file type: .{0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Config file format, negotiated from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("").to_string(),
            )),
        }
    }
}

/// User configuration: presentation hints plus the todo file location
///
/// Every key is optional; the core only consumes `file`, the CLI layer
/// consumes `editor` and `viewer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor command for `tick edit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Pager command for `tick view`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<String>,

    /// Todo file path override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Config {
    /// Loads the config at `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let parsed = match format {
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Toml => {
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
        };

        parsed.with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Saves the config to `path` in the format its extension names
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ConfigFormat::from_path(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let content = match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize config")?
            }
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).context("Failed to serialize config")?
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).context("Failed to serialize config")?
            }
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Returns the default config path (`config.toml` in the platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tick", "tick-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolves the todo file path: explicit override, then config, then
    /// `~/TODO.md`
    pub fn todo_file(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path);
        }
        if let Some(path) = &self.file {
            return Ok(path.clone());
        }

        let dirs = UserDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(dirs.home_dir().join("TODO.md"))
    }
}
