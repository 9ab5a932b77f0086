//! Theme contrast classification
//!
//! Decides whether toolbar icons should use their dark or light variant
//! based on the currently enabled theme.

use serde::{Deserialize, Serialize};

use crate::host::{ExtensionKind, ThemeInfo};

/// Theme ids known to have a dark background and need light icons.
pub const DARK_THEME_IDS: &[&str] = &["firefox-compact-dark@mozilla.org@personas.mozilla.org"];

/// Name of the stock theme that follows the environment appearance.
pub const DEFAULT_THEME_NAME: &str = "Default";

/// Icon contrast selection. One process-wide value, no per-tab override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Light,
    Dark,
}

impl Contrast {
    /// Filename suffix for this contrast variant.
    pub fn suffix(&self) -> &'static str {
        match self {
            Contrast::Light => "light",
            Contrast::Dark => "dark",
        }
    }
}

/// Classify the enabled theme as dark or light.
///
/// Dark when the theme id is on the built-in allow-list or in `extra`, or
/// when the stock "Default" theme is active and the environment prefers
/// dark (`follow_system`). Absent or unrecognized themes are light.
pub fn resolve_contrast(
    theme: Option<&ThemeInfo>,
    prefers_dark: bool,
    follow_system: bool,
    extra: &[String],
) -> Contrast {
    let Some(theme) = theme else {
        return Contrast::Light;
    };
    if theme.kind != ExtensionKind::Theme {
        return Contrast::Light;
    }

    if DARK_THEME_IDS.contains(&theme.id.as_str()) || extra.iter().any(|id| *id == theme.id) {
        return Contrast::Dark;
    }

    if follow_system && prefers_dark && theme.name == DEFAULT_THEME_NAME {
        return Contrast::Dark;
    }

    Contrast::Light
}
