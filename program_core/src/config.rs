//! Configuration file support for progen.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/progen/config.toml`. It
//! points at the catalog and rule files to use; either may be omitted to
//! fall back to the built-in defaults.

use crate::catalog::{flatten, get_default_database, CatalogIndex, ExerciseDatabase};
use crate::rules::GenerationRules;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Data file locations
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct PathsConfig {
    /// Exercise database JSON; the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Generation rules TOML; the built-in rules when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
}

/// Program output formatting
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            path => {
                tracing::info!(?path, "No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!(?path, "Loaded config");
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("progen").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!(?path, "Saved config");
        Ok(())
    }

    /// Rules from the configured file, validated, or the built-in defaults
    pub fn load_rules(&self) -> Result<GenerationRules> {
        match &self.paths.rules {
            Some(path) => GenerationRules::load_validated(path),
            None => Ok(GenerationRules::default()),
        }
    }

    /// Raw exercise database from the configured file, or the built-in one
    pub fn load_database(&self) -> Result<ExerciseDatabase> {
        match &self.paths.catalog {
            Some(path) => ExerciseDatabase::load_from(path),
            None => Ok(get_default_database().clone()),
        }
    }

    /// Flattened catalog, checked against the rules' vocabulary
    pub fn load_catalog(&self, rules: &GenerationRules) -> Result<CatalogIndex> {
        let index = flatten(&self.load_database()?)?;
        let problems = index.validate(rules);
        if !problems.is_empty() {
            return Err(Error::DataIntegrity(problems.join("; ")));
        }
        Ok(index)
    }
}
