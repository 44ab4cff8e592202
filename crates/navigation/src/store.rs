use std::sync::Arc;

use admin_types::MenuNode;
use serde::Serialize;
use tokio::sync::watch;

use crate::catalog::MenuCatalog;

/// How the current tree was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOrigin {
    /// Nothing loaded yet.
    Empty,
    /// Catalog pruned against a permission grant.
    Filtered,
    /// Permission lookup failed; the full catalog is shown.
    Fallback,
}

/// A complete, immutable menu. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuTree {
    sections: Vec<MenuNode>,
    origin: MenuOrigin,
}

impl MenuTree {
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
            origin: MenuOrigin::Empty,
        }
    }

    pub fn filtered(sections: Vec<MenuNode>) -> Self {
        Self {
            sections,
            origin: MenuOrigin::Filtered,
        }
    }

    pub fn fallback(catalog: &MenuCatalog) -> Self {
        Self {
            sections: catalog.sections().to_vec(),
            origin: MenuOrigin::Fallback,
        }
    }

    pub fn sections(&self) -> &[MenuNode] {
        &self.sections
    }

    pub fn origin(&self) -> MenuOrigin {
        self.origin
    }
}

/// Shared holder of the current [`MenuTree`].
///
/// Writers swap in a whole new tree; readers take an `Arc` snapshot and keep
/// a consistent view for as long as they hold it. Cloning the store shares it.
#[derive(Debug, Clone)]
pub struct MenuStore {
    sender: Arc<watch::Sender<Arc<MenuTree>>>,
}

impl Default for MenuStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(MenuTree::empty()));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<MenuTree> {
        Arc::clone(&self.sender.borrow())
    }

    pub fn replace(&self, tree: MenuTree) {
        self.sender.send_replace(Arc::new(tree));
    }

    /// Receiver notified after every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MenuTree>> {
        self.sender.subscribe()
    }
}
