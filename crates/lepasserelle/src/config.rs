// Project Configuration
//
// *La Configuration* (The Configuration) - Project settings for LeMaillage

use crate::errors::{MaillageError, Result};
use leregistre::RecommendationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "lemaillage.toml";

/// Project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    /// Input and output locations
    pub paths: PathConfig,

    /// Link policy settings
    pub engine: EngineConfig,
}

/// Input and output locations, relative to the project root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Registry JSON file
    pub registry: PathBuf,

    /// Directory receiving the reports and the links data file
    pub out_dir: PathBuf,

    /// Source file with AUTO_LINKS sentinels, used by `report --apply`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_file: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("content/registry.json"),
            out_dir: PathBuf::from("reports/links"),
            target_file: None,
        }
    }
}

/// Engine settings: the recommendation policy plus execution options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the per-page pass on the rayon pool
    pub parallel: bool,

    /// Recommendation policy
    #[serde(flatten)]
    pub recommendation: RecommendationConfig,
}

impl ProjectConfig {
    /// Load configuration from a directory
    ///
    /// Looks for `lemaillage.toml` in the project directory.
    /// If not found, returns default configuration.
    pub fn load<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let config_path = project_path.as_ref().join(DEFAULT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            MaillageError::io_error("Failed to read config file", &config_path, e)
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            MaillageError::Config { message, suggestion } => MaillageError::Config {
                message: format!("{}: {}", config_path.display(), message),
                suggestion,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            MaillageError::config_error(
                e.to_string(),
                Some(format!(
                    "Run `lemaillage init` to write a default {DEFAULT_CONFIG_FILE}"
                )),
            )
        })
    }

    /// Save configuration to a directory
    pub fn save<P: AsRef<Path>>(&self, project_path: P) -> Result<PathBuf> {
        let config_path = project_path.as_ref().join(DEFAULT_CONFIG_FILE);

        let toml_string = toml::to_string_pretty(self).map_err(|e| {
            MaillageError::config_error(format!("Failed to serialize configuration: {e}"), None)
        })?;

        fs::write(&config_path, toml_string).map_err(|e| {
            MaillageError::io_error("Failed to write config file", &config_path, e)
        })?;

        Ok(config_path)
    }

    /// Registry path resolved against `project_path`
    pub fn registry_path(&self, project_path: &Path) -> PathBuf {
        project_path.join(&self.paths.registry)
    }

    /// Output directory resolved against `project_path`
    pub fn out_dir(&self, project_path: &Path) -> PathBuf {
        project_path.join(&self.paths.out_dir)
    }

    /// Injection target resolved against `project_path`
    pub fn target_file(&self, project_path: &Path) -> Option<PathBuf> {
        self.paths
            .target_file
            .as_ref()
            .map(|target| project_path.join(target))
    }
}
