// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI configuration, stored as TOML

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lulugo.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_board_size")]
    pub board_size: u8,
    /// Where the JSON move list is persisted after every change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Visits forwarded with analysis requests
    #[serde(default = "default_max_visits")]
    pub max_visits: u32,
}

fn default_board_size() -> u8 {
    19
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_visits() -> u32 {
    lulugo_core::analysis::DEFAULT_MAX_VISITS
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            history_path: None,
            log_filter: default_log_filter(),
            max_visits: default_max_visits(),
        }
    }
}

impl CliConfig {
    /// Reject values the engine or codec cannot handle
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size > lulugo_core::coord::MAX_LABELLED_SIZE {
            bail!(
                "Invalid board size {}. Must be between 1 and {}.",
                self.board_size,
                lulugo_core::coord::MAX_LABELLED_SIZE
            );
        }
        Ok(())
    }
}

/// Config as read at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: CliConfig,
    /// The file was missing and a default one was written
    pub created: bool,
}

/// Load the config at `path`, writing a default one first if the file is missing.
///
/// Runs before logging is set up, so it reports creation instead of logging it.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config = CliConfig::default();
        save_config(path, &config)?;
        return Ok(LoadedConfig {
            config,
            created: true,
        });
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = toml::from_str::<CliConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(LoadedConfig {
        config,
        created: false,
    })
}

pub fn save_config(path: &Path, config: &CliConfig) -> Result<()> {
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::debug!("Saved config to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.board_size, 19);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.max_visits, 500);
        assert!(config.history_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CliConfig = toml::from_str("board_size = 9").unwrap();
        assert_eq!(config.board_size, 9);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_size() {
        let config = CliConfig {
            board_size: 26,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_creates_default() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join(DEFAULT_CONFIG_FILE);

        let loaded = load_config(&config_path)?;
        assert_eq!(loaded.config, CliConfig::default());
        assert!(loaded.created);
        assert!(config_path.exists());
        assert!(!load_config(&config_path)?.created);

        let custom = CliConfig {
            board_size: 13,
            history_path: Some(temp_dir.path().join("game.json")),
            ..CliConfig::default()
        };
        save_config(&config_path, &custom)?;
        assert_eq!(load_config(&config_path)?.config, custom);
        Ok(())
    }
}
