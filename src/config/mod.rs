//! Configuration management for kanji-stroke

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::stroke::Speed;
use crate::theme::Theme;

const APP_NAME: &str = "kanji-stroke";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Custom theme overrides (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<Theme>,

    /// Directory holding `kanji-grade{N}.json` and `bushu-data.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Endpoint that earned points are posted to; unset disables sync
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_endpoint: Option<String>,

    /// Difficulty preselected on the puzzle menu (1-3)
    pub default_puzzle_difficulty: u8,

    /// Replay speed the stroke review switches to after starting
    pub review_speed: Speed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Sumi".to_string(),
            custom_theme: None,
            data_dir: None,
            sync_endpoint: None,
            default_puzzle_difficulty: 1,
            review_speed: Speed::Normal,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            let config: Self =
                serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Reject values the engines cannot use
    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.default_puzzle_difficulty) {
            bail!(
                "default_puzzle_difficulty must be 1-3, got {}",
                self.default_puzzle_difficulty
            );
        }
        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", APP_NAME).context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path, where progress is stored
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", APP_NAME).context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory the kanji and puzzle JSON files are read from
    pub fn kanji_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("data")),
        }
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        self.custom_theme.clone().unwrap_or_else(Theme::sumi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sumi_theme() {
        let config = Config::default();
        assert_eq!(config.theme, "Sumi");
        assert_eq!(config.active_theme().name, "Sumi");
    }

    #[test]
    fn default_config_is_valid_and_unsynced() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.sync_endpoint.is_none());
    }

    #[test]
    fn config_deserializes_partial_json() {
        let json = r#"{"theme":"Custom","review_speed":"slow","data_dir":"/tmp/kanji"}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme, "Custom");
        assert_eq!(config.review_speed, Speed::Slow);
        assert_eq!(config.default_puzzle_difficulty, 1);
        assert_eq!(config.kanji_data_dir().unwrap(), PathBuf::from("/tmp/kanji"));
    }

    #[test]
    fn out_of_range_difficulty_is_rejected() {
        let config = Config { default_puzzle_difficulty: 4, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("sync_endpoint"));
        assert!(json.contains("\"review_speed\":\"normal\""));
    }
}
