//! Settings management for ReloadBar
//!
//! Handles persistent configuration including:
//! - Extra dark-theme ids extending the built-in allow-list
//! - Whether the stock "Default" theme follows the system appearance
//! - The icon asset root

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme ids treated as dark in addition to the built-in allow-list
    pub extra_dark_themes: Vec<String>,

    /// Treat the stock "Default" theme as dark when the environment
    /// prefers dark
    pub default_theme_follows_system: bool,

    /// Root directory of the icon assets
    pub data_root: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extra_dark_themes: Vec::new(),
            default_theme_follows_system: true,
            data_root: "data".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ReloadBar").join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from a specific path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("invalid settings file, using defaults: {}", e),
                }
            }
        }
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine settings path"))?;
        self.save_to(&path)
    }

    /// Save settings to a specific path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        Ok(())
    }

    /// Check whether a theme id is on the extended allow-list
    pub fn is_extra_dark_theme(&self, id: &str) -> bool {
        self.extra_dark_themes.iter().any(|t| t == id)
    }

    /// Add a theme id to the extended allow-list
    pub fn add_dark_theme(&mut self, id: &str) -> bool {
        if self.is_extra_dark_theme(id) {
            return false;
        }
        self.extra_dark_themes.push(id.to_string());
        true
    }

    /// Remove a theme id from the extended allow-list
    pub fn remove_dark_theme(&mut self, id: &str) -> bool {
        let before = self.extra_dark_themes.len();
        self.extra_dark_themes.retain(|t| t != id);
        self.extra_dark_themes.len() != before
    }
}
