//! Configuration management for Madingley CLI.

use anyhow::{Context, Result};
use madingley::prelude::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "madingley.toml";
pub const DATA_DIR: &str = ".madingley";

/// Madingley project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_steps")]
    pub steps: u64,
}

fn default_steps() -> u64 { 12 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

impl Config {
    /// Load config from madingley.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .model
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find madingley.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Get the Madingley data directory (.madingley/).
pub fn data_dir() -> Result<PathBuf> {
    let dir = std::env::current_dir()?.join(DATA_DIR);
    Ok(dir)
}

/// Get the sessions directory.
pub fn sessions_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("sessions"))
}

/// Get the current snapshot file path.
pub fn current_snapshot_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("current.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.run.steps = 24;
        config.model.grid.num_lon_cells = 5;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.run.steps, 24);
        assert_eq!(loaded.model, config.model);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[model]\ndispersal_only = true\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.run.steps, 12);
        assert!(loaded.model.dispersal_only);
        assert_eq!(loaded.model.grid, ModelConfig::default().grid);
    }

    #[test]
    fn invalid_model_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[model.grid]\ncell_size = -1.0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
