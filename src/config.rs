use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::naming::DEFAULT_MAX_ATTEMPTS;

const APP_DIR: &str = "survey-cli";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Snapshot file holding the form store; defaults next to the config file
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: usize,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_max_name_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_log_file() -> String {
    "survey-cli.log".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            default_locale: default_locale(),
            max_name_attempts: default_max_name_attempts(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // Use XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            // Use home directory with dot prefix on Windows/Mac
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    /// Where the store snapshot lives
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.settings.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_config_dir()?.join("store.json")),
        }
    }

    /// Update a setting from its string form, as typed on the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "store_path" => self.settings.store_path = Some(PathBuf::from(value)),
            "default_locale" => {
                let locale = value.trim();
                if locale.is_empty() {
                    anyhow::bail!("default_locale can't be blank");
                }
                self.settings.default_locale = locale.to_string();
            }
            "max_name_attempts" => {
                let attempts: usize = value
                    .parse()
                    .with_context(|| format!("Invalid value for max_name_attempts: '{}'", value))?;
                if attempts == 0 {
                    anyhow::bail!("max_name_attempts must be at least 1");
                }
                self.settings.max_name_attempts = attempts;
            }
            "log_file" => self.settings.log_file = value.to_string(),
            _ => anyhow::bail!(
                "Unknown setting '{}'. Valid settings: store_path, default_locale, max_name_attempts, log_file",
                key
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.settings.max_name_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_round_trip_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("default_locale", "fr").unwrap();
        config.set("max_name_attempts", "25").unwrap();
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        fs::write(&path, "[settings]\ndefault_locale = \"sw\"\n").unwrap();
        let partial = Config::load_from(&path).unwrap();
        assert_eq!(partial.settings.default_locale, "sw");
        assert_eq!(partial.settings.log_file, "survey-cli.log");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = Config::default();
        assert!(config.set("max_name_attempts", "zero").is_err());
        assert!(config.set("max_name_attempts", "0").is_err());
        assert!(config.set("colour", "blue").is_err());
    }
}
