use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::RefreshSettings;
use crate::tibia::DEFAULT_API_BASE;
use crate::ui::theme::ThemePreset;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

/// What to track and how often
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Game world whose guilds are listed
    #[serde(default = "default_world")]
    pub world: String,
    /// Refresh the selected guild periodically
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    /// Seconds between automatic refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            world: default_world(),
            auto_refresh: true,
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_world() -> String {
    "Inabra".to_string()
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    30
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// TibiaData base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Look and feel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    #[serde(default)]
    pub theme: ThemePreset,
}

impl TrackerConfig {
    /// Refresh interval, never shorter than five seconds
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(5))
    }
}

impl Config {
    /// Settings for a refresh coordinator session
    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            world: self.tracker.world.clone(),
            interval: self.tracker.refresh_interval(),
            auto_refresh: self.tracker.auto_refresh,
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "guildwatch", "Guildwatch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tracker.world, "Inabra");
        assert!(config.tracker.auto_refresh);
        assert_eq!(config.tracker.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[tracker]\nworld = \"Ferobra\"\n").unwrap();
        assert_eq!(config.tracker.world, "Ferobra");
        assert_eq!(config.tracker.refresh_interval_secs, 30);
        assert_eq!(config.appearance.theme, ThemePreset::default());
    }

    #[test]
    fn test_interval_has_floor() {
        let tracker = TrackerConfig {
            refresh_interval_secs: 1,
            ..Default::default()
        };
        assert_eq!(tracker.refresh_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        // Missing file means defaults
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut config = Config::default();
        config.tracker.world = "Antica".to_string();
        config.tracker.auto_refresh = false;
        config.appearance.theme = ThemePreset::Catppuccin;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tracker = 12").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
