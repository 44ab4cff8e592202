//! Lifecycle of the filtered menu.
//!
//! [`MenuRefresher`] is a small state machine:
//!
//! ```text
//! Idle ──request, cache fresh──▶ Idle
//! Idle ──request, cache stale──▶ Debouncing   (timer armed)
//! Debouncing ──request──▶ Debouncing          (timer re-armed)
//! Debouncing ──timer fires──▶ Fetching
//! Fetching ──success──▶ Idle                  (tree replaced, timestamp updated)
//! Fetching ──failure──▶ Idle                  (full catalog shown, timestamp kept)
//! ```
//!
//! Requests that arrive while a fetch is in flight are absorbed by it. A
//! failed fetch leaves the cache stale so the next request retries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::MenuCatalog;
use crate::filter::{EmptySectionPolicy, filter_catalog};
use crate::source::PermissionSource;
use crate::store::{MenuStore, MenuTree};
use crate::timer::{Scheduler, TimerHandle, TokioScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub cache_duration: Duration,
    pub debounce: Duration,
    pub empty_sections: EmptySectionPolicy,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            cache_duration: Duration::from_millis(5_000),
            debounce: Duration::from_millis(100),
            empty_sections: EmptySectionPolicy::Retain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Debouncing,
    Fetching,
}

#[derive(Debug)]
struct RefreshState {
    phase: RefreshPhase,
    /// Completion time of the last successful refresh; `None` until one succeeds.
    last_refresh: Option<Instant>,
    pending: Option<TimerHandle>,
    /// Bumped whenever the pending timer is replaced, so a stale timer firing late is ignored.
    generation: u64,
}

struct RefresherInner {
    catalog: Arc<MenuCatalog>,
    source: Arc<dyn PermissionSource>,
    scheduler: Arc<dyn Scheduler>,
    store: MenuStore,
    settings: RefreshSettings,
    state: Mutex<RefreshState>,
}

/// Owner of the filtered menu held in a [`MenuStore`]. Cloning shares the controller.
#[derive(Clone)]
pub struct MenuRefresher {
    inner: Arc<RefresherInner>,
}

impl std::fmt::Debug for MenuRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuRefresher")
            .field("settings", &self.inner.settings)
            .field("phase", &self.phase())
            .finish()
    }
}

impl MenuRefresher {
    pub fn new(
        catalog: Arc<MenuCatalog>,
        source: Arc<dyn PermissionSource>,
        store: MenuStore,
        settings: RefreshSettings,
    ) -> Self {
        Self::with_scheduler(catalog, source, store, settings, Arc::new(TokioScheduler))
    }

    pub fn with_scheduler(
        catalog: Arc<MenuCatalog>,
        source: Arc<dyn PermissionSource>,
        store: MenuStore,
        settings: RefreshSettings,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Arc::new(RefresherInner {
                catalog,
                source,
                scheduler,
                store,
                settings,
                state: Mutex::new(RefreshState {
                    phase: RefreshPhase::Idle,
                    last_refresh: None,
                    pending: None,
                    generation: 0,
                }),
            }),
        }
    }

    pub fn store(&self) -> &MenuStore {
        &self.inner.store
    }

    pub fn phase(&self) -> RefreshPhase {
        self.inner.lock_state().phase
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.inner.lock_state().last_refresh
    }

    /// Ask for a refresh after an authenticated navigation.
    ///
    /// Returns immediately. Within the cache window this is a no-op; otherwise
    /// the fetch is scheduled after the debounce window, restarting any timer
    /// that is already pending.
    pub fn request_refresh(&self) {
        let mut state = self.inner.lock_state();
        if state.phase == RefreshPhase::Fetching {
            debug!("menu fetch in flight; request absorbed");
            return;
        }
        if let Some(last) = state.last_refresh
            && last.elapsed() < self.inner.settings.cache_duration
        {
            debug!("menu cache fresh; skipping refresh");
            return;
        }

        if let Some(pending) = state.pending.take() {
            debug!("restarting menu refresh debounce");
            pending.cancel();
        }
        state.generation += 1;
        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.settings.debounce, Box::pin(async move { inner.fire(generation).await }));
        state.pending = Some(handle);
        state.phase = RefreshPhase::Debouncing;
    }

    /// Fetch and apply immediately, bypassing the cache window and debounce.
    ///
    /// Used for the initial load. A pending debounce timer is cancelled. If a
    /// fetch is already in flight this returns without waiting for it.
    pub async fn load_now(&self) {
        {
            let mut state = self.inner.lock_state();
            if state.phase == RefreshPhase::Fetching {
                return;
            }
            if let Some(pending) = state.pending.take() {
                pending.cancel();
            }
            state.generation += 1;
            state.phase = RefreshPhase::Fetching;
        }
        self.inner.fetch_and_apply().await;
        self.inner.lock_state().phase = RefreshPhase::Idle;
    }

    /// Run [`Self::load_now`] in the background so the menu is populated before first render.
    pub fn spawn_initial_load(&self) -> JoinHandle<()> {
        let refresher = self.clone();
        tokio::spawn(async move { refresher.load_now().await })
    }
}

impl RefresherInner {
    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn fire(&self, generation: u64) {
        {
            let mut state = self.lock_state();
            if state.generation != generation || state.phase != RefreshPhase::Debouncing {
                return;
            }
            state.pending = None;
            state.phase = RefreshPhase::Fetching;
        }
        self.fetch_and_apply().await;
        self.lock_state().phase = RefreshPhase::Idle;
    }

    async fn fetch_and_apply(&self) {
        match self.source.fetch_grant().await {
            Ok(grant) => {
                let sections = filter_catalog(&self.catalog, &grant, self.settings.empty_sections);
                let visible_items: usize = sections.iter().map(|section| section.children.len()).sum();
                self.store.replace(MenuTree::filtered(sections));
                self.lock_state().last_refresh = Some(Instant::now());
                info!(visible_items, "menu refreshed from permissions");
            }
            Err(error) => {
                warn!(error = %error, "failed to load menu permissions; showing full catalog");
                self.store.replace(MenuTree::fallback(&self.catalog));
            }
        }
    }
}
