//! Configuration handling for the archive tools
//!
//! Configuration is read from `~/.config/libalex/config.toml` (or the
//! platform equivalent), or from an explicit path. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::loader::LoaderConfig;
use crate::domain::defaults::DEFAULT_META_FILENAME;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands, shared by the config file and `--format`
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Meta file name looked up inside item directories
    pub meta_filename: String,

    /// Archive used by `scan` when no root is given
    pub archive_root: Option<PathBuf>,

    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta_filename: DEFAULT_META_FILENAME.to_string(),
            archive_root: None,
            default_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "libalex", "libalex").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads the global configuration, or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::global_config_dir() {
            Some(dir) => {
                let path = dir.join("config.toml");
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;

        Ok(config)
    }

    /// Parses and validates TOML configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.meta_filename.trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid("meta_filename must not be empty".into()));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "meta_filename must be a plain file name, got '{}'",
                name
            )));
        }
        Ok(())
    }

    /// Loader settings derived from this configuration
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            meta_filename: self.meta_filename.clone(),
        }
    }
}
