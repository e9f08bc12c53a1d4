use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub analysis: AnalysisConfig,
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory holding the `*.json` cleaner definitions
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Worker threads (0 = auto)
    pub workers: usize,
    /// Maximum sample paths reported per item
    pub sample_cap: usize,
    /// Capacity of the walk producer channel
    pub walk_channel_capacity: usize,
    /// Deadline for one analysis, in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Deadline for installed-rule discovery, in seconds
    pub timeout_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("resources"),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            sample_cap: 500,
            walk_channel_capacity: 100,
            timeout_secs: 300,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DetectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/rusty-reclaim/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rusty-reclaim").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.sample_cap == 0 {
            return Err(ConfigError::Invalid(
                "analysis.sample_cap must be at least 1".to_string(),
            ));
        }
        if self.analysis.walk_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "analysis.walk_channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
