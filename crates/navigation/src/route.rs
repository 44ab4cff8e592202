//! Route observation and the binding that keeps navigation state current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use admin_types::{BreadcrumbEntry, MenuKey};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::publisher::ActiveStatePublisher;
use crate::resolver::NavigationResolver;
use crate::store::MenuStore;

type RouteCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct RouteInner {
    current: RwLock<String>,
    subscribers: Mutex<Vec<(u64, RouteCallback)>>,
    next_id: AtomicU64,
}

/// The current route path plus synchronous change notification.
///
/// Cloning shares the signal.
#[derive(Clone)]
pub struct RouteSignal {
    inner: Arc<RouteInner>,
}

impl std::fmt::Debug for RouteSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteSignal").field("current", &self.current()).finish()
    }
}

impl RouteSignal {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RouteInner {
                current: RwLock::new(initial.into()),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn current(&self) -> String {
        self.inner.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Move to `path`, notifying subscribers in registration order. Navigating
    /// to the current path notifies nobody.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        {
            let mut current = self.inner.current.write().unwrap_or_else(PoisonError::into_inner);
            if *current == path {
                return;
            }
            current.clone_from(&path);
        }
        debug!(%path, "route changed");
        for callback in self.callbacks() {
            callback(&path);
        }
    }

    /// Register `callback`; it runs once right away with the current path and
    /// then on every change until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, callback: impl Fn(&str) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: RouteCallback = Arc::new(callback);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));
        callback(&self.current());
        Subscription {
            id,
            route: Arc::downgrade(&self.inner),
        }
    }

    // Snapshot so callbacks run without the lock held and may subscribe or navigate.
    fn callbacks(&self) -> Vec<RouteCallback> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }
}

/// Detaches its callback from the [`RouteSignal`] when dropped.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    route: Weak<RouteInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(route) = self.route.upgrade() {
            route
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

struct BindingState {
    route: RouteSignal,
    resolver: NavigationResolver,
    publisher: Arc<dyn ActiveStatePublisher>,
    breadcrumbs: RwLock<Vec<BreadcrumbEntry>>,
    active_key: RwLock<Option<MenuKey>>,
    // Held across read, resolve, publish and store.
    resolving: Mutex<()>,
}

impl BindingState {
    /// Resolve whatever the route is at the time the lock is taken.
    ///
    /// Publishers must not navigate from `set_active_key`.
    fn refresh(&self) {
        let _resolving = self.resolving.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.route.current();
        let resolution = self.resolver.resolve(&path);
        if let Some(key) = &resolution.active_key {
            self.publisher.set_active_key(key);
        }
        *self.active_key.write().unwrap_or_else(PoisonError::into_inner) = resolution.active_key;
        *self.breadcrumbs.write().unwrap_or_else(PoisonError::into_inner) = resolution.breadcrumbs;
    }
}

/// Keeps the active key and breadcrumb trail in step with the route and the menu.
pub struct NavigationBinding {
    state: Arc<BindingState>,
    _subscription: Subscription,
    menu_watch: Option<JoinHandle<()>>,
}

impl NavigationBinding {
    /// Subscribe to `route`. Resolution runs immediately for the current path.
    pub fn attach(
        route: &RouteSignal,
        resolver: NavigationResolver,
        publisher: Arc<dyn ActiveStatePublisher>,
    ) -> Self {
        let state = Arc::new(BindingState {
            route: route.clone(),
            resolver,
            publisher,
            breadcrumbs: RwLock::new(Vec::new()),
            active_key: RwLock::new(None),
            resolving: Mutex::new(()),
        });
        let weak = Arc::downgrade(&state);
        let subscription = route.subscribe(move |_| {
            if let Some(state) = weak.upgrade() {
                state.refresh();
            }
        });
        Self {
            state,
            _subscription: subscription,
            menu_watch: None,
        }
    }

    /// Re-resolve the current route whenever `store` receives a new tree.
    ///
    /// Must be called from within a Tokio runtime. Calling it again replaces
    /// the previous watcher.
    pub fn watch_menu(&mut self, store: &MenuStore) {
        let mut receiver = store.subscribe();
        let state = Arc::downgrade(&self.state);
        let task = tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let Some(state) = state.upgrade() else { break };
                state.refresh();
            }
        });
        if let Some(previous) = self.menu_watch.replace(task) {
            previous.abort();
        }
    }

    pub fn breadcrumbs(&self) -> Vec<BreadcrumbEntry> {
        self.state.breadcrumbs.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn active_key(&self) -> Option<MenuKey> {
        self.state.active_key.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Drop for NavigationBinding {
    fn drop(&mut self) {
        if let Some(task) = self.menu_watch.take() {
            task.abort();
        }
    }
}
