//! Icon State Tracker
//!
//! Owns the derived UI state: the process-wide contrast flag, per-tab
//! revert timers for in-flight transition animations, and the navigation
//! timestamps used to debounce re-triggered animations.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::host::{ActionSurface, HostApi, TabId, TabSnapshot};

use super::contrast::Contrast;
use super::icon::{IconKind, IconLocator};
use super::titles::ActionTitles;

/// Intrinsic duration of the transition animations.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(417);

/// Same window in milliseconds, for navigation-timestamp arithmetic.
pub const ANIMATION_DURATION_MS: f64 = 417.0;

/// Delivered when a tab's animation window elapses and the static icon
/// should be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertDue {
    pub tab_id: TabId,
    pub generation: u64,
}

/// At most one of these per tab. Superseding aborts the timer task, and the
/// generation catches an expiry that was already queued when superseded.
struct PendingRevert {
    handle: JoinHandle<()>,
    generation: u64,
}

/// Per-tab icon/animation state and the operations that apply it to the host.
pub struct IconStateTracker {
    contrast: Contrast,
    icons: IconLocator,
    titles: ActionTitles,
    reverts: HashMap<TabId, PendingRevert>,
    last_navigation: HashMap<TabId, f64>,
    next_generation: u64,
    revert_tx: mpsc::UnboundedSender<RevertDue>,
}

impl IconStateTracker {
    /// Create a tracker and the channel its revert timers fire into.
    pub fn new(
        icons: IconLocator,
        titles: ActionTitles,
    ) -> (Self, mpsc::UnboundedReceiver<RevertDue>) {
        let (revert_tx, revert_rx) = mpsc::unbounded_channel();
        let tracker = Self {
            contrast: Contrast::Light,
            icons,
            titles,
            reverts: HashMap::new(),
            last_navigation: HashMap::new(),
            next_generation: 0,
            revert_tx,
        };
        (tracker, revert_rx)
    }

    pub fn contrast(&self) -> Contrast {
        self.contrast
    }

    pub fn set_contrast(&mut self, contrast: Contrast) {
        self.contrast = contrast;
    }

    pub fn set_titles(&mut self, titles: ActionTitles) {
        self.titles = titles;
    }

    pub fn set_icons(&mut self, icons: IconLocator) {
        self.icons = icons;
    }

    /// Whether a transition animation is still in flight for a tab.
    pub fn has_pending_animation(&self, tab_id: TabId) -> bool {
        self.reverts.contains_key(&tab_id)
    }

    /// Record a top-level navigation and decide whether to animate.
    ///
    /// Navigations arriving faster than the animation window snap straight
    /// to the static frame instead of restarting the animation mid-flight.
    /// The stored timestamp is always overwritten (last navigation wins).
    pub fn note_navigation(&mut self, tab_id: TabId, timestamp: f64) -> bool {
        let animate = match self.last_navigation.get(&tab_id) {
            Some(&prior) => timestamp - prior >= ANIMATION_DURATION_MS,
            None => true,
        };
        self.last_navigation.insert(tab_id, timestamp);
        animate
    }

    /// Apply icon and title for a tab to both action surfaces.
    pub async fn render(&mut self, host: &dyn HostApi, tab: &TabSnapshot, animate: bool) {
        self.apply_titles(host, tab).await;
        self.apply_icon(host, tab, animate).await;
    }

    /// Apply the matching title to both surfaces. Failures (tab closed
    /// mid-flight) are logged and dropped.
    pub async fn apply_titles(&self, host: &dyn HostApi, tab: &TabSnapshot) {
        let title = self.titles.for_status(tab.status);
        for surface in ActionSurface::both() {
            if let Err(e) = host.set_title(surface, tab.id, title).await {
                tracing::debug!("title update dropped for tab {}: {}", tab.id, e);
            }
        }
    }

    /// Apply the icon to both surfaces.
    ///
    /// Animated renders use the transition asset with a fresh cache token
    /// and schedule the static revert, replacing any pending one for this
    /// tab.
    pub async fn apply_icon(&mut self, host: &dyn HostApi, tab: &TabSnapshot, animate: bool) {
        let path = if animate {
            self.icons
                .animated_path(IconKind::transition_for(tab.status), self.contrast)
        } else {
            self.icons
                .path(IconKind::static_for(tab.status), self.contrast)
        };

        for surface in ActionSurface::both() {
            if let Err(e) = host.set_icon(surface, tab.id, &path).await {
                tracing::debug!("icon update dropped for tab {}: {}", tab.id, e);
            }
        }

        if animate {
            self.schedule_revert(tab.id);
        }
    }

    /// Check an expiry against the pending entry; true means the caller
    /// should restore the static icon. Stale generations are ignored.
    pub fn confirm_revert(&mut self, due: RevertDue) -> bool {
        match self.reverts.get(&due.tab_id) {
            Some(pending) if pending.generation == due.generation => {
                self.reverts.remove(&due.tab_id);
                true
            }
            _ => false,
        }
    }

    fn schedule_revert(&mut self, tab_id: TabId) {
        self.next_generation += 1;
        let generation = self.next_generation;

        if let Some(previous) = self.reverts.remove(&tab_id) {
            previous.handle.abort();
        }

        let tx = self.revert_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ANIMATION_DURATION).await;
            let _ = tx.send(RevertDue { tab_id, generation });
        });

        self.reverts.insert(tab_id, PendingRevert { handle, generation });
    }
}
