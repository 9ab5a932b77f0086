//! Bridge wire protocol
//!
//! Newline-delimited JSON, three shapes: host-initiated events, our
//! fire-and-forget commands, and id-correlated query/response pairs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::menus::MenuItemId;

use super::{ActionSurface, TabId, TabSnapshot, ThemeInfo};

/// Fire-and-forget instruction to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
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
        #[serde(default, skip_serializing_if = "Option::is_none")]
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

/// Query answered by the host with a correlated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    Tabs,
    Tab { tab_id: TabId },
    ActiveTheme,
    PlatformInfo,
}

/// Outgoing query envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub query: Query,
}

/// Incoming answer to a `Request`, matched by `reply_to`.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub reply_to: u64,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}

/// Frame and timing of a navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationDetail {
    pub tab_id: TabId,
    /// 0 is the main document frame; anything else is a subframe.
    #[serde(default)]
    pub frame_id: i64,
    /// Milliseconds, host clock.
    #[serde(default)]
    pub time_stamp: f64,
}

impl NavigationDetail {
    pub fn is_top_level(&self) -> bool {
        self.frame_id == 0
    }
}

/// Host-initiated notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// A tab appeared; show the action on it.
    TabCreated { tab: TabSnapshot },
    /// A tab's load status changed.
    TabUpdated { tab: TabSnapshot },
    /// An extension was enabled; only `type == theme` entries matter.
    ThemeEnabled { info: ThemeInfo },
    /// Top-level or subframe navigation started.
    NavigationCommitted {
        #[serde(flatten)]
        detail: NavigationDetail,
    },
    /// Navigation finished loading.
    NavigationCompleted {
        #[serde(flatten)]
        detail: NavigationDetail,
    },
    /// Navigation failed.
    NavigationError {
        #[serde(flatten)]
        detail: NavigationDetail,
    },
    /// The user clicked either action surface.
    ActionClicked { tab: TabSnapshot },
    /// A context-menu entry was chosen.
    MenuClicked { item: MenuItemId, tab: TabSnapshot },
    /// A bound keyboard command fired.
    CommandInvoked { name: String },
}

/// A classified inbound line.
#[derive(Debug)]
pub enum Inbound {
    Response(Response),
    Event(HostEvent),
}

/// Classify one wire line: responses carry `reply_to`, everything else
/// must parse as an event.
pub fn parse_line(line: &str) -> Result<Inbound, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("reply_to").is_some() {
        Ok(Inbound::Response(serde_json::from_value(value)?))
    } else {
        Ok(Inbound::Event(serde_json::from_value(value)?))
    }
}
