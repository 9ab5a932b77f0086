//! Context-menu entries for the action surfaces
//!
//! Three reload variants, dispatched by item id. The keyboard command bound
//! by the host reuses the empty-cache entry's id.

use serde::{Deserialize, Serialize};

use crate::host::{HostApi, HostError};

/// Name of the bound keyboard command; matches the menu item id.
pub const EMPTY_CACHE_COMMAND: &str = "empty_cache_and_hard_reload";

/// Context-menu entries registered on both action surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItemId {
    /// Plain reload; behaves exactly like clicking the action.
    NormalReload,
    /// Reload bypassing the HTTP cache.
    HardReload,
    /// Clear the cache, then reload bypassing it.
    EmptyCacheAndHardReload,
}

impl MenuItemId {
    pub fn all() -> &'static [MenuItemId] {
        &[
            MenuItemId::NormalReload,
            MenuItemId::HardReload,
            MenuItemId::EmptyCacheAndHardReload,
        ]
    }

    /// Wire id for registration and click dispatch.
    pub fn id(&self) -> &'static str {
        match self {
            MenuItemId::NormalReload => "normal_reload",
            MenuItemId::HardReload => "hard_reload",
            MenuItemId::EmptyCacheAndHardReload => EMPTY_CACHE_COMMAND,
        }
    }

    /// English menu label; localized catalogs live with the host.
    pub fn title(&self) -> &'static str {
        match self {
            MenuItemId::NormalReload => "Reload",
            MenuItemId::HardReload => "Hard Reload",
            MenuItemId::EmptyCacheAndHardReload => "Empty Cache and Hard Reload",
        }
    }
}

/// Register all entries with the host.
pub async fn register_all(host: &dyn HostApi) -> Result<(), HostError> {
    for item in MenuItemId::all() {
        host.create_menu(item.id(), item.title()).await?;
    }
    Ok(())
}
