//! Route-to-menu resolution.
//!
//! All lookups are depth-first, pre-order, and match a node's `route`
//! against the path exactly: no prefix matching, no case folding, no
//! trailing-slash normalization. The first match in document order wins.

use admin_types::{BreadcrumbEntry, MenuKey, MenuNode};

use crate::publisher::ActiveStatePublisher;
use crate::store::MenuStore;

/// Index path (sibling indices from the root) of the first node routing to `path`.
fn locate(nodes: &[MenuNode], path: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.routes_to(path) {
            return Some(vec![index]);
        }
        if let Some(mut rest) = locate(&node.children, path) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

pub fn find_by_path<'a>(nodes: &'a [MenuNode], path: &str) -> Option<&'a MenuNode> {
    for node in nodes {
        if node.routes_to(path) {
            return Some(node);
        }
        if let Some(found) = find_by_path(&node.children, path) {
            return Some(found);
        }
    }
    None
}

/// Ancestor chain from the root down to and including the matched node.
pub fn breadcrumb_path<'a>(nodes: &'a [MenuNode], path: &str) -> Option<Vec<&'a MenuNode>> {
    for node in nodes {
        if node.routes_to(path) {
            return Some(vec![node]);
        }
        if let Some(mut chain) = breadcrumb_path(&node.children, path) {
            chain.insert(0, node);
            return Some(chain);
        }
    }
    None
}

/// Positional key of the matched node's parent. Root-level matches have none.
pub fn parent_key(nodes: &[MenuNode], path: &str) -> Option<MenuKey> {
    let indices = locate(nodes, path)?;
    MenuKey::from_indices(&indices[..indices.len() - 1])
}

/// Fixed values the resolver falls back on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Label of the grouping section that never appears in breadcrumbs.
    pub root_label: String,
    /// First entry of a synthesized breadcrumb trail.
    pub home: BreadcrumbEntry,
    /// Icon for synthesized path-segment breadcrumbs.
    pub segment_icon: String,
    /// First path segment → key published when no menu entry matches.
    pub fallback_anchors: Vec<(String, MenuKey)>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            root_label: "Main".to_string(),
            home: BreadcrumbEntry::new("Home", Some("/dashboard".to_string()), "dashboard-icon"),
            segment_icon: "pi pi-fw pi-file".to_string(),
            fallback_anchors: vec![("dashboard".to_string(), MenuKey::new("0"))],
        }
    }
}

/// Active key and breadcrumbs computed from a single menu snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub active_key: Option<MenuKey>,
    pub breadcrumbs: Vec<BreadcrumbEntry>,
}

/// Read-only navigation queries over the current [`MenuStore`] contents.
///
/// Each call works on one snapshot, so a concurrent refresh is seen either
/// entirely or not at all.
#[derive(Debug, Clone)]
pub struct NavigationResolver {
    store: MenuStore,
    settings: ResolverSettings,
}

impl NavigationResolver {
    pub fn new(store: MenuStore) -> Self {
        Self::with_settings(store, ResolverSettings::default())
    }

    pub fn with_settings(store: MenuStore, settings: ResolverSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn find_by_path(&self, path: &str) -> Option<MenuNode> {
        let tree = self.store.snapshot();
        find_by_path(tree.sections(), path).cloned()
    }

    pub fn breadcrumb_path(&self, path: &str) -> Option<Vec<MenuNode>> {
        let tree = self.store.snapshot();
        breadcrumb_path(tree.sections(), path).map(|chain| chain.into_iter().cloned().collect())
    }

    pub fn parent_key(&self, path: &str) -> Option<MenuKey> {
        parent_key(self.store.snapshot().sections(), path)
    }

    /// Key that should render as expanded for `path`, if any.
    pub fn active_key(&self, path: &str) -> Option<MenuKey> {
        self.active_key_in(self.store.snapshot().sections(), path)
    }

    /// Compute the active key for `path` and publish it when there is one.
    pub fn resolve_active(&self, path: &str, publisher: &dyn ActiveStatePublisher) -> Option<MenuKey> {
        let key = self.active_key(path);
        if let Some(key) = &key {
            publisher.set_active_key(key);
        }
        key
    }

    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbEntry> {
        self.breadcrumbs_in(self.store.snapshot().sections(), path)
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let tree = self.store.snapshot();
        Resolution {
            active_key: self.active_key_in(tree.sections(), path),
            breadcrumbs: self.breadcrumbs_in(tree.sections(), path),
        }
    }

    fn active_key_in(&self, sections: &[MenuNode], path: &str) -> Option<MenuKey> {
        match locate(sections, path) {
            // A nested match opens its parent; a root-level match is its own key.
            Some(indices) if indices.len() > 1 => MenuKey::from_indices(&indices[..indices.len() - 1]),
            Some(indices) => MenuKey::from_indices(&indices),
            None => {
                let first_segment = path.split('/').find(|segment| !segment.is_empty())?;
                self.settings
                    .fallback_anchors
                    .iter()
                    .find(|(anchor, _)| anchor == first_segment)
                    .map(|(_, key)| key.clone())
            }
        }
    }

    fn breadcrumbs_in(&self, sections: &[MenuNode], path: &str) -> Vec<BreadcrumbEntry> {
        if let Some(chain) = breadcrumb_path(sections, path) {
            return chain
                .into_iter()
                .filter(|node| node.label != self.settings.root_label)
                .map(BreadcrumbEntry::from)
                .collect();
        }
        self.synthesize_breadcrumbs(path)
    }

    /// Home, then one entry per path segment; the last segment is not a link.
    fn synthesize_breadcrumbs(&self, path: &str) -> Vec<BreadcrumbEntry> {
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
        let mut trail = vec![self.settings.home.clone()];
        let mut accumulated = String::new();
        for (index, segment) in segments.iter().enumerate() {
            accumulated.push('/');
            accumulated.push_str(segment);
            let route = (index + 1 < segments.len()).then(|| accumulated.clone());
            trail.push(BreadcrumbEntry::new(capitalize(segment), route, self.settings.segment_icon.clone()));
        }
        trail
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuCatalog;
    use crate::store::MenuTree;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        keys: Mutex<Vec<String>>,
    }

    impl ActiveStatePublisher for RecordingPublisher {
        fn set_active_key(&self, key: &MenuKey) {
            self.keys.lock().unwrap().push(key.to_string());
        }
    }

    fn resolver_over(sections: Vec<MenuNode>) -> NavigationResolver {
        let store = MenuStore::new();
        store.replace(MenuTree::filtered(sections));
        NavigationResolver::new(store)
    }

    fn builtin_resolver() -> NavigationResolver {
        resolver_over(MenuCatalog::builtin().sections().to_vec())
    }

    fn labels(entries: &[BreadcrumbEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    #[test]
    fn finds_nested_entries_by_exact_route() {
        let resolver = builtin_resolver();
        assert_eq!(resolver.find_by_path("/menu-management/sub-menus").unwrap().label, "Sub Menus");
        assert!(resolver.find_by_path("/menu-management/sub").is_none());
        assert!(resolver.find_by_path("/Menu-Management").is_none());
    }

    #[test]
    fn trailing_slash_is_not_normalized() {
        let resolver = builtin_resolver();
        assert!(resolver.find_by_path("/dashboard/home").is_some());
        assert!(resolver.find_by_path("/dashboard/home/").is_none());
        assert!(resolver.breadcrumb_path("/dashboard/home/").is_none());
    }

    #[test]
    fn first_match_in_preorder_wins() {
        let sections = vec![
            MenuNode::link("Shallow", "", "/x").with_children(vec![MenuNode::group(
                "Group",
                "",
                vec![MenuNode::link("Deep", "", "/x")],
            )]),
            MenuNode::link("Later", "", "/x"),
        ];
        let resolver = resolver_over(sections);
        assert_eq!(resolver.find_by_path("/x").unwrap().label, "Shallow");
        assert_eq!(resolver.breadcrumb_path("/x").unwrap().len(), 1);
    }

    #[test]
    fn breadcrumb_path_includes_root_section() {
        let resolver = builtin_resolver();
        let chain = resolver.breadcrumb_path("/dashboard/home").unwrap();
        let chain_labels: Vec<&str> = chain.iter().map(|node| node.label.as_str()).collect();
        assert_eq!(chain_labels, vec!["Main", "Dashboard", "Home"]);
    }

    #[test]
    fn breadcrumbs_hide_the_root_section() {
        let resolver = builtin_resolver();
        let trail = resolver.breadcrumbs("/dashboard/home");
        assert_eq!(labels(&trail), vec!["Dashboard", "Home"]);
        assert_eq!(trail[1].route.as_deref(), Some("/dashboard/home"));
    }

    #[test]
    fn unmatched_paths_get_a_synthesized_trail() {
        let resolver = builtin_resolver();
        let trail = resolver.breadcrumbs("/unknown/page");
        assert_eq!(labels(&trail), vec!["Home", "Unknown", "Page"]);
        assert_eq!(trail[0].route.as_deref(), Some("/dashboard"));
        assert_eq!(trail[1].route.as_deref(), Some("/unknown"));
        assert_eq!(trail[2].route, None);
        assert_eq!(trail[2].icon, "pi pi-fw pi-file");

        let root_only = resolver.breadcrumbs("/");
        assert_eq!(labels(&root_only), vec!["Home"]);
    }

    #[test]
    fn parent_keys_are_dash_joined_indices() {
        let resolver = builtin_resolver();
        assert_eq!(resolver.parent_key("/dashboard").unwrap().as_str(), "0");
        assert_eq!(resolver.parent_key("/menu-management/sub-menus").unwrap().as_str(), "0-2");
        assert_eq!(resolver.parent_key("/website-settings/site-info").unwrap().as_str(), "0-3");
        assert!(resolver.parent_key("/nowhere").is_none());
    }

    #[test]
    fn root_level_match_publishes_its_own_index() {
        let resolver = resolver_over(vec![
            MenuNode::link("Overview", "", "/overview"),
            MenuNode::link("Reports", "", "/reports"),
        ]);
        assert!(resolver.parent_key("/reports").is_none());

        let publisher = RecordingPublisher::default();
        assert_eq!(resolver.resolve_active("/reports", &publisher).unwrap().as_str(), "1");
        assert_eq!(*publisher.keys.lock().unwrap(), vec!["1".to_string()]);
    }

    #[test]
    fn resolve_active_publishes_parent_or_fallback() {
        let resolver = builtin_resolver();
        let publisher = RecordingPublisher::default();

        resolver.resolve_active("/user-management/roles", &publisher);
        resolver.resolve_active("/dashboard/reports/weekly", &publisher);
        assert!(resolver.resolve_active("/profile/settings", &publisher).is_none());

        assert_eq!(*publisher.keys.lock().unwrap(), vec!["0-1".to_string(), "0".to_string()]);
    }

    #[test]
    fn resolve_uses_one_snapshot_for_both_outputs() {
        let resolver = builtin_resolver();
        let resolution = resolver.resolve("/menu-management/menus");
        assert_eq!(resolution.active_key.unwrap().as_str(), "0-2");
        assert_eq!(labels(&resolution.breadcrumbs), vec!["Menu Management", "Menus"]);
    }

    #[test]
    fn capitalizes_only_the_first_character() {
        assert_eq!(capitalize("sub-menus"), "Sub-menus");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
