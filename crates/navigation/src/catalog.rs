//! The static navigation catalog.
//!
//! A catalog is validated once, when it is constructed; the rest of the
//! navigation core relies on its invariants without re-checking them.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use admin_types::MenuNode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("menu entry at {position} has children but no label")]
    UnlabeledGroup { position: String },

    #[error("duplicate label '{label}' among siblings at {position}")]
    DuplicateSibling { label: String, position: String },

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validated tree of every menu entry the panel can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuCatalog {
    sections: Vec<MenuNode>,
}

impl MenuCatalog {
    pub fn new(sections: Vec<MenuNode>) -> Result<Self, CatalogError> {
        validate(&sections, "root")?;
        Ok(Self { sections })
    }

    /// The catalog compiled into the panel.
    pub fn builtin() -> Self {
        let sections = vec![MenuNode::group(
            "Main",
            "home-icon",
            vec![
                MenuNode::link("Dashboard", "dashboard-icon", "/dashboard").with_children(vec![MenuNode::link(
                    "Home",
                    "pi pi-circle-off",
                    "/dashboard/home",
                )]),
                MenuNode::link("Manage Account", "pi pi-user", "/user-management").with_children(vec![MenuNode::link(
                    "Role",
                    "pi pi-circle-off",
                    "/user-management/roles",
                )]),
                MenuNode::link("Menu Management", "pi pi-fw pi-bars", "/menu-management").with_children(vec![
                    MenuNode::link("Menus", "pi pi-circle-off", "/menu-management/menus"),
                    MenuNode::link("Sub Menus", "pi pi-circle-off", "/menu-management/sub-menus"),
                ]),
                MenuNode::link("Website Settings", "pi pi-globe", "/website-settings").with_children(vec![
                    MenuNode::link("Site Info", "pi pi-circle-off", "/website-settings/site-info"),
                ]),
            ],
        )];
        Self { sections }
    }

    /// Parse a catalog from JSON: an array of sections.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let sections: Vec<MenuNode> = serde_json::from_str(content)?;
        Self::new(sections)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn sections(&self) -> &[MenuNode] {
        &self.sections
    }
}

fn validate(nodes: &[MenuNode], position: &str) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for (index, node) in nodes.iter().enumerate() {
        let node_position = if position == "root" {
            index.to_string()
        } else {
            format!("{position}-{index}")
        };
        if node.has_children() && node.label.trim().is_empty() {
            return Err(CatalogError::UnlabeledGroup { position: node_position });
        }
        if !node.label.is_empty() && !seen.insert(node.label.as_str()) {
            return Err(CatalogError::DuplicateSibling {
                label: node.label.clone(),
                position: position.to_string(),
            });
        }
        validate(&node.children, &node_position)?;
    }
    Ok(())
}
