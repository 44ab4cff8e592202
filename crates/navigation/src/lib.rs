//! Navigation core for the admin panel.
//!
//! The static [`MenuCatalog`] is pruned against the server-reported
//! [`admin_types::PermissionGrant`] by [`filter_catalog`]. A
//! [`MenuRefresher`] owns the lifecycle of the resulting tree (initial load,
//! cache window, debounce, fail-open fallback) and publishes it through a
//! [`MenuStore`]. The [`NavigationResolver`] reads consistent snapshots of that
//! store to find the active entry and breadcrumb trail for a route, and a
//! [`NavigationBinding`] keeps both in sync with a [`RouteSignal`], while a
//! [`RefreshGuard`] asks the refresher for a new menu on authenticated navigation.

pub mod catalog;
pub mod filter;
pub mod guard;
pub mod publisher;
pub mod refresh;
pub mod resolver;
pub mod route;
pub mod source;
pub mod store;
pub mod timer;

pub use catalog::{CatalogError, MenuCatalog};
pub use filter::{EmptySectionPolicy, filter_catalog};
pub use guard::{RefreshGuard, requires_auth};
pub use publisher::{ActiveStatePublisher, TracingPublisher};
pub use refresh::{MenuRefresher, RefreshPhase, RefreshSettings};
pub use resolver::{NavigationResolver, Resolution, ResolverSettings};
pub use route::{NavigationBinding, RouteSignal, Subscription};
pub use source::{ApiPermissionSource, PermissionSource, PermissionSourceError};
pub use store::{MenuOrigin, MenuStore, MenuTree};
pub use timer::{Scheduler, TimerHandle, TokioScheduler};
