//! Persisted user settings (default speed and control panel visibility).
//!
//! The options page edits these; everything else comes from [`Config`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::{default_speed, default_true, Config};

/// Settings persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_speed")]
    pub default_speed: f64,

    #[serde(default = "default_true")]
    pub overlay_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_speed: default_speed(),
            overlay_enabled: true,
        }
    }
}

impl Settings {
    /// Replace an unusable default speed with the built-in one.
    pub fn sanitized(mut self) -> Self {
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            warn!(
                "Ignoring invalid default speed {}, using {}",
                self.default_speed,
                default_speed()
            );
            self.default_speed = default_speed();
        }
        self
    }

    /// Overlay these settings onto a configuration.
    pub fn apply_to(&self, config: &mut Config) {
        config.scroll.default_speed = config.scroll.clamp_speed(self.default_speed);
        config.scroll.overlay_enabled = self.overlay_enabled;
    }
}

/// File-backed settings store.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.autoscroll/settings.toml`.
    pub fn default_location() -> Self {
        Self::new(ConfigLoader::home_dir().join("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if !self.path.exists() {
            debug!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings.sanitized())
    }

    /// Persist settings, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let settings = settings.clone().sanitized();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&settings)?)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
