//! Action titles
//!
//! Tooltip text for the toolbar control, carrying the platform's reload
//! shortcut. Localized catalogs live with the host; these are the English
//! templates.

use crate::host::{LoadStatus, Os};

/// Idle/busy tooltip pair applied alongside every icon update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTitles {
    pub idle: String,
    pub busy: String,
}

impl ActionTitles {
    /// Titles with the platform-appropriate reload shortcut.
    pub fn for_platform(os: Os) -> Self {
        let reload_key = match os {
            Os::Mac => "\u{2318}+R",
            _ => "Ctrl+R",
        };
        Self {
            idle: format!("Reload ({})", reload_key),
            busy: "Stop (Esc)".to_string(),
        }
    }

    /// Title matching a tab's load state. Unknown states read as idle.
    pub fn for_status(&self, status: LoadStatus) -> &str {
        if status.is_loading() {
            &self.busy
        } else {
            &self.idle
        }
    }
}

impl Default for ActionTitles {
    // Ctrl shortcuts until the platform query answers.
    fn default() -> Self {
        Self::for_platform(Os::Linux)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_uses_command_key() {
        let titles = ActionTitles::for_platform(Os::Mac);
        assert_eq!(titles.idle, "Reload (\u{2318}+R)");
    }

    #[test]
    fn test_other_platforms_use_ctrl() {
        for os in [Os::Win, Os::Linux, Os::Other] {
            let titles = ActionTitles::for_platform(os);
            assert_eq!(titles.idle, "Reload (Ctrl+R)");
        }
    }

    #[test]
    fn test_title_per_status() {
        let titles = ActionTitles::default();
        assert_eq!(titles.for_status(LoadStatus::Loading), "Stop (Esc)");
        assert_eq!(titles.for_status(LoadStatus::Complete), titles.idle);
        assert_eq!(titles.for_status(LoadStatus::Other), titles.idle);
    }
}
