// Configuration management
// Layers built-in defaults, the TOML config file and AI_VX_* environment variables

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Prefix of environment variables that override the config file
pub const ENV_PREFIX: &str = "AI_VX";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the analysis backend
    pub server_url: String,

    /// Redraws per second of the viewer
    pub frame_rate: u32,

    /// Width of the virtual drawing surface, in pixels
    pub surface_width: u32,

    /// Height of the virtual drawing surface, in pixels
    pub surface_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            frame_rate: 30,
            surface_width: 800,
            surface_height: 600,
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    settings: Settings,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Loads settings from the user's config directory
    pub fn new() -> Result<Self> {
        let mut config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Failed to determine config directory".to_string()))?;
        config_dir.push("ai_vx");

        Self::with_file(config_dir.join("config.toml"))
    }

    /// Loads settings from a specific file. A missing file means defaults.
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_file = path.as_ref().to_path_buf();
        if !config_file.exists() {
            debug!("Config file {:?} not found, using defaults", config_file);
        }
        let settings = Self::load(&config_file)?;

        Ok(Self {
            settings,
            config_file,
        })
    }

    fn load(path: &Path) -> Result<Settings> {
        let defaults = config::Config::try_from(&Settings::default())
            .map_err(|e| Error::Config(format!("Failed to build defaults: {}", e)))?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| Error::Config(format!("Failed to load {:?}: {}", path, e)))
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<()> {
        let toml = toml::to_string_pretty(&self.settings)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;

        if let Some(parent) = self.config_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        fs::write(&self.config_file, toml)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        debug!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
