//! Host browser abstraction
//!
//! Everything ReloadBar knows about the browser comes through the `HostApi`
//! trait: tab snapshots, the enabled theme, platform facts, and the icon/
//! title/tab-control commands. The stdio bridge implements it for real runs;
//! tests substitute a recording double.

pub mod bridge;
pub mod protocol;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host-assigned tab identifier.
pub type TabId = i64;

/// Load state reported by the host for a tab.
///
/// The host may grow new states; anything unrecognized decodes to `Other`
/// and renders like `Complete` (idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    #[default]
    Complete,
    #[serde(other)]
    Other,
}

impl LoadStatus {
    /// Only `Loading` counts as busy; unknown states are idle.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// Read-only view of a tab, supplied by the host per query or event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    #[serde(default)]
    pub status: LoadStatus,
}

/// Kind of an installed extension entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    Theme,
    Extension,
    #[serde(other)]
    Other,
}

/// Descriptor of the currently enabled theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeInfo {
    #[serde(rename = "type")]
    pub kind: ExtensionKind,
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Operating system reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Mac,
    Win,
    #[default]
    Linux,
    #[serde(other)]
    Other,
}

/// Direction of the host locale; selects the asset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Platform facts fetched once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformInfo {
    #[serde(default)]
    pub os: Os,
    /// Environment-level "prefers dark" signal.
    #[serde(default)]
    pub prefers_dark: bool,
    #[serde(default)]
    pub text_direction: TextDirection,
}

/// The two action surfaces every icon/title update is mirrored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionSurface {
    /// Page-scoped control in the address bar.
    Page,
    /// Global toolbar control.
    Toolbar,
}

impl ActionSurface {
    /// Both surfaces, in the order updates are applied.
    pub fn both() -> [ActionSurface; 2] {
        [ActionSurface::Page, ActionSurface::Toolbar]
    }
}

/// Errors from host interactions.
///
/// All of these are non-fatal to the UI logic; callers log and continue.
#[derive(Debug, Error)]
pub enum HostError {
    /// The bridge to the host has shut down.
    #[error("host connection closed")]
    Closed,
    /// The host rejected a request (e.g. tab closed mid-flight).
    #[error("host rejected request: {0}")]
    Rejected(String),
    /// A reply could not be decoded into the expected shape.
    #[error("malformed host reply: {0}")]
    Decode(#[from] serde_json::Error),
    /// Writing to the host failed.
    #[error("host write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Interface to the host browser.
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Enumerate all open tabs.
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>, HostError>;

    /// Fetch a single tab snapshot.
    async fn get_tab(&self, tab_id: TabId) -> Result<TabSnapshot, HostError>;

    /// The currently enabled theme, if any.
    async fn active_theme(&self) -> Result<Option<ThemeInfo>, HostError>;

    /// OS, prefers-dark signal, and locale direction.
    async fn platform_info(&self) -> Result<PlatformInfo, HostError>;

    /// Set the action icon on one surface.
    async fn set_icon(
        &self,
        surface: ActionSurface,
        tab_id: TabId,
        path: &str,
    ) -> Result<(), HostError>;

    /// Set the action title on one surface.
    async fn set_title(
        &self,
        surface: ActionSurface,
        tab_id: TabId,
        title: &str,
    ) -> Result<(), HostError>;

    /// Make the page action visible on a tab.
    async fn show_action(&self, tab_id: TabId) -> Result<(), HostError>;

    /// Reload a tab (the active tab when `None`), optionally bypassing
    /// the HTTP cache.
    async fn reload_tab(&self, tab_id: Option<TabId>, bypass_cache: bool)
        -> Result<(), HostError>;

    /// Stop a loading page by injecting `window.stop()`.
    ///
    /// Rejected on privileged/about:/error pages.
    async fn inject_stop(&self, tab_id: TabId) -> Result<(), HostError>;

    /// Clear the browser cache.
    async fn clear_cache(&self) -> Result<(), HostError>;

    /// Register a context-menu entry on both action surfaces.
    async fn create_menu(&self, id: &str, title: &str) -> Result<(), HostError>;
}

#[cfg(test)]
pub mod testing {
    //! Recording host double for tracker and controller tests.

    use std::sync::Mutex;

    use super::*;

    /// One observed host call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum HostCall {
        SetIcon {
            surface: ActionSurface,
            tab_id: TabId,
            path: String,
        },
        SetTitle {
            surface: ActionSurface,
            tab_id: TabId,
            title: String,
        },
        ShowAction {
            tab_id: TabId,
        },
        ReloadTab {
            tab_id: Option<TabId>,
            bypass_cache: bool,
        },
        InjectStop {
            tab_id: TabId,
        },
        ClearCache,
        CreateMenu {
            id: String,
            title: String,
        },
    }

    /// Host double that answers queries from canned data and records
    /// every command it receives.
    #[derive(Default)]
    pub struct RecordingHost {
        pub tabs: Mutex<Vec<TabSnapshot>>,
        pub theme: Mutex<Option<ThemeInfo>>,
        pub platform: Mutex<PlatformInfo>,
        pub reject_inject: Mutex<bool>,
        pub calls: Mutex<Vec<HostCall>>,
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tabs(tabs: Vec<TabSnapshot>) -> Self {
            let host = Self::default();
            *host.tabs.lock().unwrap() = tabs;
            host
        }

        pub fn calls(&self) -> Vec<HostCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        fn record(&self, call: HostCall) {
            self.calls.lock().unwrap().push(call);
        }

        /// Icon paths applied to a tab, in order, across both surfaces.
        pub fn icon_paths(&self, tab: TabId) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    HostCall::SetIcon { tab_id, path, .. } if tab_id == tab => Some(path),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl HostApi for RecordingHost {
        async fn query_tabs(&self) -> Result<Vec<TabSnapshot>, HostError> {
            Ok(self.tabs.lock().unwrap().clone())
        }

        async fn get_tab(&self, tab_id: TabId) -> Result<TabSnapshot, HostError> {
            self.tabs
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == tab_id)
                .copied()
                .ok_or_else(|| HostError::Rejected(format!("no tab {}", tab_id)))
        }

        async fn active_theme(&self) -> Result<Option<ThemeInfo>, HostError> {
            Ok(self.theme.lock().unwrap().clone())
        }

        async fn platform_info(&self) -> Result<PlatformInfo, HostError> {
            Ok(*self.platform.lock().unwrap())
        }

        async fn set_icon(
            &self,
            surface: ActionSurface,
            tab_id: TabId,
            path: &str,
        ) -> Result<(), HostError> {
            self.record(HostCall::SetIcon {
                surface,
                tab_id,
                path: path.to_string(),
            });
            Ok(())
        }

        async fn set_title(
            &self,
            surface: ActionSurface,
            tab_id: TabId,
            title: &str,
        ) -> Result<(), HostError> {
            self.record(HostCall::SetTitle {
                surface,
                tab_id,
                title: title.to_string(),
            });
            Ok(())
        }

        async fn show_action(&self, tab_id: TabId) -> Result<(), HostError> {
            self.record(HostCall::ShowAction { tab_id });
            Ok(())
        }

        async fn reload_tab(
            &self,
            tab_id: Option<TabId>,
            bypass_cache: bool,
        ) -> Result<(), HostError> {
            self.record(HostCall::ReloadTab {
                tab_id,
                bypass_cache,
            });
            Ok(())
        }

        async fn inject_stop(&self, tab_id: TabId) -> Result<(), HostError> {
            if *self.reject_inject.lock().unwrap() {
                return Err(HostError::Rejected("cannot inject into page".into()));
            }
            self.record(HostCall::InjectStop { tab_id });
            Ok(())
        }

        async fn clear_cache(&self) -> Result<(), HostError> {
            self.record(HostCall::ClearCache);
            Ok(())
        }

        async fn create_menu(&self, id: &str, title: &str) -> Result<(), HostError> {
            self.record(HostCall::CreateMenu {
                id: id.to_string(),
                title: title.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_decodes_to_other() {
        let tab: TabSnapshot = serde_json::from_str(r#"{"id": 3, "status": "prerender"}"#).unwrap();
        assert_eq!(tab.status, LoadStatus::Other);
        assert!(!tab.status.is_loading());
    }

    #[test]
    fn test_missing_status_defaults_to_complete() {
        let tab: TabSnapshot = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(tab.status, LoadStatus::Complete);
    }

    #[test]
    fn test_theme_info_type_field() {
        let info: ThemeInfo = serde_json::from_str(
            r#"{"type": "theme", "id": "some-theme@mozilla.org", "name": "Some Theme"}"#,
        )
        .unwrap();
        assert_eq!(info.kind, ExtensionKind::Theme);

        let info: ThemeInfo =
            serde_json::from_str(r#"{"type": "dictionary", "id": "x", "name": ""}"#).unwrap();
        assert_eq!(info.kind, ExtensionKind::Other);
    }

    #[test]
    fn test_platform_info_defaults() {
        let info: PlatformInfo = serde_json::from_str(r#"{"os": "mac"}"#).unwrap();
        assert_eq!(info.os, Os::Mac);
        assert!(!info.prefers_dark);
        assert_eq!(info.text_direction, TextDirection::Ltr);
    }
}
