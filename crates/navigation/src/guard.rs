//! Menu refresh on authenticated navigation.

use tracing::debug;

use crate::refresh::MenuRefresher;
use crate::route::{RouteSignal, Subscription};

/// Path prefixes reachable without signing in.
const PUBLIC_PREFIXES: &[&str] = &["/auth/", "/landing", "/pages/notfound"];

/// Whether `path` sits behind authentication in the admin panel router.
pub fn requires_auth(path: &str) -> bool {
    path != "/" && !PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Requests a menu refresh whenever the route moves to an authenticated page.
///
/// The check runs for the current path on attach and then on every change.
/// Bursts of navigation collapse through the refresher's debounce and cache
/// window. Navigation must happen inside a Tokio runtime while a guard is
/// attached.
#[derive(Debug)]
pub struct RefreshGuard {
    _subscription: Subscription,
}

impl RefreshGuard {
    pub fn attach(route: &RouteSignal, refresher: MenuRefresher) -> Self {
        Self::with_predicate(route, refresher, requires_auth)
    }

    pub fn with_predicate(
        route: &RouteSignal,
        refresher: MenuRefresher,
        gated: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        let subscription = route.subscribe(move |path| {
            if gated(path) {
                refresher.request_refresh();
            } else {
                debug!(%path, "public route; menu refresh not requested");
            }
        });
        Self {
            _subscription: subscription,
        }
    }
}
