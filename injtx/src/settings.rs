//! Tool settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use inj_catalog::Modulation;
use serde::{Deserialize, Serialize};

/// Defaults applied when a flag is not given on the command line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Interface name (e.g. wlan0)
    #[serde(default)]
    pub interface: String,
    /// Driver name
    #[serde(default)]
    pub driver: String,
    /// Channel to transmit on
    #[serde(default = "default_channel")]
    pub channel: i32,
    /// Modulation requested before transmitting
    #[serde(default = "default_modulation")]
    pub modulation: Modulation,
    /// Rate in Mb/s; `null` keeps the driver default
    #[serde(default = "default_rate")]
    pub rate: Option<f64>,
    /// Seconds between packets
    #[serde(default)]
    pub sleep_secs: f64,
}

fn default_channel() -> i32 {
    1
}

fn default_modulation() -> Modulation {
    Modulation::Dsss
}

fn default_rate() -> Option<f64> {
    Some(2.0)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interface: String::new(),
            driver: String::new(),
            channel: default_channel(),
            modulation: default_modulation(),
            rate: default_rate(),
            sleep_secs: 0.0,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for injtx
    /// Uses $XDG_CONFIG_HOME/injtx, falls back to ~/.config/injtx
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("injtx"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("injtx"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to the default location, returning the path written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::settings_path().context("Could not determine settings path")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Reject values that cannot drive a transmit run
    pub fn validate(&self) -> Result<()> {
        if !self.sleep_secs.is_finite() || self.sleep_secs < 0.0 {
            bail!(
                "Sleep must be a non-negative number of seconds, got {}",
                self.sleep_secs
            );
        }
        self.sleep_duration()?;
        Ok(())
    }

    /// Pause between packets
    pub fn sleep_duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.sleep_secs)
            .with_context(|| format!("Sleep of {} seconds is out of range", self.sleep_secs))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }
}
