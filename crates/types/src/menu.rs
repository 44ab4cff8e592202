use std::fmt;

use serde::{Deserialize, Serialize};

/// A single entry in the navigation tree.
///
/// Sections, menu items and sub-items all share this shape. Only navigable
/// entries carry a `route`; grouping entries carry `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Display text. Also the key matched against server-granted menu names.
    pub label: String,
    /// Presentational icon identifier, opaque to the navigation core.
    #[serde(default)]
    pub icon: String,
    /// Route path for navigable entries.
    #[serde(default, alias = "to", skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Ordered child entries.
    #[serde(default, alias = "items", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// A grouping node without a route.
    pub fn group(label: impl Into<String>, icon: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            route: None,
            children,
        }
    }

    /// A navigable node without children.
    pub fn link(label: impl Into<String>, icon: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            route: Some(route.into()),
            children: Vec::new(),
        }
    }

    /// Replace the children of this node.
    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this node's route equals `path` exactly.
    pub fn routes_to(&self, path: &str) -> bool {
        self.route.as_deref() == Some(path)
    }
}

/// Positional identifier of a menu entry: sibling indices from the root,
/// joined with `-` (for example `0-2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuKey(String);

impl MenuKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build a key from a non-empty index path. Returns `None` for an empty path.
    pub fn from_indices(indices: &[usize]) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }
        let joined = indices.iter().map(usize::to_string).collect::<Vec<_>>().join("-");
        Some(Self(joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MenuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of the breadcrumb trail.
///
/// An entry without a route denotes the current page and is rendered as
/// plain text rather than a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default)]
    pub icon: String,
}

impl BreadcrumbEntry {
    pub fn new(label: impl Into<String>, route: Option<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route,
            icon: icon.into(),
        }
    }

    pub fn is_link(&self) -> bool {
        self.route.is_some()
    }
}

impl From<&MenuNode> for BreadcrumbEntry {
    fn from(node: &MenuNode) -> Self {
        Self {
            label: node.label.clone(),
            route: node.route.clone(),
            icon: node.icon.clone(),
        }
    }
}
