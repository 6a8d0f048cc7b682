use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    error::{Result, WeatherError},
    model::TemperatureUnit,
    provider::ProviderId,
};

/// Credentials for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration. Loaded once at startup and handed to the
/// provider constructors; nothing else reads the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preferred temperature unit when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<TemperatureUnit>,

    /// Example TOML:
    /// [providers.radar]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Configuration(format!(
                    "Failed to create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let toml = toml::to_string_pretty(self).map_err(|e| {
            WeatherError::Configuration(format!("Failed to serialize configuration to TOML: {e}"))
        })?;

        fs::write(path, toml).map_err(|e| {
            WeatherError::Configuration(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli").ok_or_else(|| {
            WeatherError::Configuration("Could not determine platform config directory".into())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Override API keys from `lookup`. Unset or empty variables leave the
    /// file value in place.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.env_var()).filter(|k| !k.trim().is_empty()) {
                debug!(provider = %id, var = id.env_var(), "API key taken from environment");
                self.providers
                    .insert(id.as_str().to_string(), ProviderConfig { api_key: key });
            }
        }
    }

    pub fn set_units(&mut self, units: TemperatureUnit) {
        self.units = Some(units);
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present and non-empty.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}
