//! Event loop
//!
//! Single-threaded dispatch of host events and revert-timer firings onto
//! the tracker and the click/menu/command handlers. Handlers run to
//! completion in delivery order; the only suspension points are host
//! queries and the timers the tracker owns.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::{
    resolve_contrast, ActionTitles, IconLocator, IconStateTracker, RevertDue,
};
use crate::host::protocol::{HostEvent, NavigationDetail};
use crate::host::{ExtensionKind, HostApi, TabId, TabSnapshot, ThemeInfo};
use crate::menus::{self, MenuItemId};
use crate::settings::Settings;

/// Wires host events to the icon state tracker.
pub struct Controller {
    host: Arc<dyn HostApi>,
    settings: Settings,
    tracker: IconStateTracker,
    events: mpsc::UnboundedReceiver<HostEvent>,
    reverts: mpsc::UnboundedReceiver<RevertDue>,
    prefers_dark: bool,
}

impl Controller {
    pub fn new(
        host: Arc<dyn HostApi>,
        settings: Settings,
        events: mpsc::UnboundedReceiver<HostEvent>,
    ) -> Self {
        let icons = IconLocator::new(&settings.data_root, Default::default());
        let (tracker, reverts) = IconStateTracker::new(icons, ActionTitles::default());
        Self {
            host,
            settings,
            tracker,
            events,
            reverts,
            prefers_dark: false,
        }
    }

    /// Sync with the host, then process events until the stream ends.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.start_up().await;

        loop {
            tokio::select! {
                Some(due) = self.reverts.recv() => self.on_revert(due).await,
                event = self.events.recv() => match event {
                    Some(event) => self.dispatch(event).await,
                    None => break,
                },
            }
        }

        tracing::info!("host event stream ended, shutting down");
        Ok(())
    }

    /// Initial sync: platform facts, contrast, menus, and the action on
    /// every open tab. Failures fall back to defaults; the next event
    /// re-synchronizes.
    async fn start_up(&mut self) {
        match self.host.platform_info().await {
            Ok(info) => {
                self.prefers_dark = info.prefers_dark;
                self.tracker.set_titles(ActionTitles::for_platform(info.os));
                self.tracker
                    .set_icons(IconLocator::new(&self.settings.data_root, info.text_direction));
            }
            Err(e) => tracing::warn!("platform query failed, keeping defaults: {}", e),
        }

        match self.host.active_theme().await {
            Ok(theme) => self.update_contrast(theme.as_ref()),
            Err(e) => tracing::warn!("theme query failed, assuming light: {}", e),
        }

        if let Err(e) = menus::register_all(&*self.host).await {
            tracing::warn!("context menu registration failed: {}", e);
        }

        match self.host.query_tabs().await {
            Ok(tabs) => {
                for tab in tabs {
                    self.show_and_render(&tab).await;
                }
            }
            Err(e) => tracing::warn!("tab enumeration failed: {}", e),
        }
    }

    async fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::TabCreated { tab } => self.show_and_render(&tab).await,
            HostEvent::TabUpdated { tab } => self.on_tab_updated(&tab).await,
            HostEvent::ThemeEnabled { info } => self.on_theme_enabled(&info).await,
            HostEvent::NavigationCommitted { detail }
            | HostEvent::NavigationCompleted { detail }
            | HostEvent::NavigationError { detail } => self.on_navigation(detail).await,
            HostEvent::ActionClicked { tab } => self.on_action_clicked(&tab).await,
            HostEvent::MenuClicked { item, tab } => self.on_menu_clicked(item, &tab).await,
            HostEvent::CommandInvoked { name } => self.on_command(&name).await,
        }
    }

    async fn show_and_render(&mut self, tab: &TabSnapshot) {
        if let Err(e) = self.host.show_action(tab.id).await {
            tracing::debug!("show dropped for tab {}: {}", tab.id, e);
        }
        self.tracker.render(&*self.host, tab, false).await;
    }

    /// Status changed. While a transition animation is in flight the icon
    /// stays with the pending revert; a static write here would snap the
    /// animation mid-frame.
    async fn on_tab_updated(&mut self, tab: &TabSnapshot) {
        if let Err(e) = self.host.show_action(tab.id).await {
            tracing::debug!("show dropped for tab {}: {}", tab.id, e);
        }
        if self.tracker.has_pending_animation(tab.id) {
            self.tracker.apply_titles(&*self.host, tab).await;
        } else {
            self.tracker.render(&*self.host, tab, false).await;
        }
    }

    async fn on_theme_enabled(&mut self, info: &ThemeInfo) {
        if info.kind != ExtensionKind::Theme {
            return;
        }
        self.update_contrast(Some(info));
        self.refresh_all_icons().await;
    }

    /// Top-level navigations animate unless they re-trigger inside the
    /// animation window; subframes are ignored entirely.
    async fn on_navigation(&mut self, detail: NavigationDetail) {
        if !detail.is_top_level() {
            return;
        }
        let animate = self
            .tracker
            .note_navigation(detail.tab_id, detail.time_stamp);
        match self.host.get_tab(detail.tab_id).await {
            Ok(tab) => self.tracker.render(&*self.host, &tab, animate).await,
            Err(e) => tracing::debug!("tab {} gone before render: {}", detail.tab_id, e),
        }
    }

    async fn on_action_clicked(&mut self, tab: &TabSnapshot) {
        if tab.status.is_loading() {
            // No stop API on the host side; injecting window.stop() is the
            // best alternative. Privileged and error pages reject it.
            if let Err(e) = self.host.inject_stop(tab.id).await {
                tracing::debug!("stop injection failed for tab {}: {}", tab.id, e);
            }
        } else if let Err(e) = self.host.reload_tab(Some(tab.id), false).await {
            tracing::debug!("reload dropped for tab {}: {}", tab.id, e);
        }
    }

    async fn on_menu_clicked(&mut self, item: MenuItemId, tab: &TabSnapshot) {
        match item {
            MenuItemId::NormalReload => self.on_action_clicked(tab).await,
            MenuItemId::HardReload => {
                if let Err(e) = self.host.reload_tab(Some(tab.id), true).await {
                    tracing::debug!("hard reload dropped for tab {}: {}", tab.id, e);
                }
            }
            MenuItemId::EmptyCacheAndHardReload => {
                self.empty_cache_and_hard_reload(Some(tab.id)).await;
            }
        }
    }

    async fn on_command(&mut self, name: &str) {
        if name == menus::EMPTY_CACHE_COMMAND {
            // The keyboard command has no tab context; the host applies
            // the reload to the active tab.
            self.empty_cache_and_hard_reload(None).await;
        } else {
            tracing::debug!("ignoring unknown command {:?}", name);
        }
    }

    /// `bypass_cache` only covers content loaded with the page; anything
    /// fetched later needs the cache cleared for real first.
    async fn empty_cache_and_hard_reload(&mut self, tab_id: Option<TabId>) {
        if let Err(e) = self.host.clear_cache().await {
            tracing::warn!("cache clear failed, skipping reload: {}", e);
            return;
        }
        if let Err(e) = self.host.reload_tab(tab_id, true).await {
            tracing::debug!("hard reload dropped: {}", e);
        }
    }

    async fn on_revert(&mut self, due: RevertDue) {
        if !self.tracker.confirm_revert(due) {
            return;
        }
        match self.host.get_tab(due.tab_id).await {
            Ok(tab) => self.tracker.render(&*self.host, &tab, false).await,
            Err(e) => tracing::debug!("tab {} gone before revert: {}", due.tab_id, e),
        }
    }

    fn update_contrast(&mut self, theme: Option<&ThemeInfo>) {
        let contrast = resolve_contrast(
            theme,
            self.prefers_dark,
            self.settings.default_theme_follows_system,
            &self.settings.extra_dark_themes,
        );
        self.tracker.set_contrast(contrast);
    }

    async fn refresh_all_icons(&mut self) {
        match self.host.query_tabs().await {
            Ok(tabs) => {
                for tab in tabs {
                    self.tracker.apply_icon(&*self.host, &tab, false).await;
                }
            }
            Err(e) => tracing::warn!("tab enumeration failed during theme change: {}", e),
        }
    }
}
