//! Configuration management commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, print_success, OutputFormat};
use crate::config::Config;
use crate::ui::theme::ThemePreset;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "tracker.world", "appearance.theme")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "tracker.world", "appearance.theme")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format).await,
        ConfigCommands::Get { key } => get(&key, format).await,
        ConfigCommands::Set { key, value } => set(&key, &value, quiet).await,
        ConfigCommands::Path => path(format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
    }

    Ok(())
}

async fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }

    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["tracker", "world"] => Ok(config.tracker.world.clone()),
        ["tracker", "auto_refresh"] => Ok(config.tracker.auto_refresh.to_string()),
        ["tracker", "refresh_interval_secs"] => {
            Ok(config.tracker.refresh_interval_secs.to_string())
        }
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["appearance", "theme"] => Ok(config.appearance.theme.name().to_string()),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

async fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;

    set_config_value(&mut config, key, value)?;
    config.save()?;

    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["tracker", "world"] => {
            let world = value.trim();
            if world.is_empty() {
                anyhow::bail!("World must not be empty");
            }
            config.tracker.world = world.to_string();
        }
        ["tracker", "auto_refresh"] => {
            config.tracker.auto_refresh = value.parse()?;
        }
        ["tracker", "refresh_interval_secs"] => {
            config.tracker.refresh_interval_secs = value.parse()?;
        }
        ["api", "base_url"] => {
            config.api.base_url = value.trim_end_matches('/').to_string();
        }
        ["appearance", "theme"] => {
            config.appearance.theme = ThemePreset::from_name(value)
                .ok_or_else(|| anyhow::anyhow!("Unknown theme: {}", value))?;
        }
        _ => anyhow::bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

async fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let config = Config::default();
        assert_eq!(get_config_value(&config, "tracker.world").unwrap(), "Inabra");
        assert_eq!(get_config_value(&config, "tracker.auto_refresh").unwrap(), "true");
        assert_eq!(
            get_config_value(&config, "tracker.refresh_interval_secs").unwrap(),
            "30"
        );
        assert_eq!(get_config_value(&config, "appearance.theme").unwrap(), "Midnight");
        assert!(get_config_value(&config, "tracker").is_err());
        assert!(get_config_value(&config, "game.directory").is_err());
    }

    #[test]
    fn test_set_config_value() {
        let mut config = Config::default();

        set_config_value(&mut config, "tracker.world", " Antica ").unwrap();
        set_config_value(&mut config, "tracker.auto_refresh", "false").unwrap();
        set_config_value(&mut config, "tracker.refresh_interval_secs", "120").unwrap();
        set_config_value(&mut config, "api.base_url", "http://localhost:8080/v4/").unwrap();
        set_config_value(&mut config, "appearance.theme", "ember").unwrap();

        assert_eq!(config.tracker.world, "Antica");
        assert!(!config.tracker.auto_refresh);
        assert_eq!(config.tracker.refresh_interval_secs, 120);
        assert_eq!(config.api.base_url, "http://localhost:8080/v4");
        assert_eq!(config.appearance.theme, ThemePreset::Ember);
    }

    #[test]
    fn test_set_config_value_rejects_bad_input() {
        let mut config = Config::default();

        assert!(set_config_value(&mut config, "tracker.world", "  ").is_err());
        assert!(set_config_value(&mut config, "tracker.auto_refresh", "maybe").is_err());
        assert!(set_config_value(&mut config, "tracker.refresh_interval_secs", "-1").is_err());
        assert!(set_config_value(&mut config, "appearance.theme", "neon").is_err());
        assert!(set_config_value(&mut config, "launcher.theme", "ember").is_err());
        assert_eq!(config, Config::default());
    }
}
