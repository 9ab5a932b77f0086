//! Icon asset path construction
//!
//! Assets follow a fixed naming scheme under a direction-specific data dir:
//! `data/{ltr|rtl}/{reload|stop}[_to_{stop|reload}]_{dark|light}.svg`.
//! Animated variants get a fresh query token so the host reloads the
//! resource instead of reusing a cached static frame.

use rand::Rng;

use crate::host::{LoadStatus, TextDirection};

use super::contrast::Contrast;

/// Which icon family member to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    /// Static reload arrow (idle).
    Reload,
    /// Static stop cross (busy).
    Stop,
    /// Transition played when a load starts.
    ReloadToStop,
    /// Transition played when a load finishes.
    StopToReload,
}

impl IconKind {
    /// Static variant for a load state. Unknown states are idle.
    pub fn static_for(status: LoadStatus) -> Self {
        if status.is_loading() {
            IconKind::Stop
        } else {
            IconKind::Reload
        }
    }

    /// Transition variant ending on the static icon for a load state.
    pub fn transition_for(status: LoadStatus) -> Self {
        if status.is_loading() {
            IconKind::ReloadToStop
        } else {
            IconKind::StopToReload
        }
    }

    fn stem(&self) -> &'static str {
        match self {
            IconKind::Reload => "reload",
            IconKind::Stop => "stop",
            IconKind::ReloadToStop => "reload_to_stop",
            IconKind::StopToReload => "stop_to_reload",
        }
    }
}

/// Builds asset paths for one data root and locale direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLocator {
    data_dir: String,
}

impl IconLocator {
    pub fn new(root: &str, direction: TextDirection) -> Self {
        Self {
            data_dir: format!("{}/{}", root.trim_end_matches('/'), direction.as_str()),
        }
    }

    /// Path of a static icon asset.
    pub fn path(&self, kind: IconKind, contrast: Contrast) -> String {
        format!("{}/{}_{}.svg", self.data_dir, kind.stem(), contrast.suffix())
    }

    /// Path of an animated icon asset with a cache-defeating token.
    pub fn animated_path(&self, kind: IconKind, contrast: Contrast) -> String {
        format!("{}?x={}", self.path(kind, contrast), cache_token())
    }
}

impl Default for IconLocator {
    fn default() -> Self {
        Self::new("data", TextDirection::Ltr)
    }
}

/// Fresh random token forcing the host to re-fetch an animated asset.
fn cache_token() -> String {
    format!("{:08x}", rand::rng().random::<u32>())
}
