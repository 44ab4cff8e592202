//! Pruning the catalog against a permission grant.
//!
//! Matching is by label: a catalog item survives when the grant names a menu
//! with the same label, and its sub-items survive when that menu lists a
//! sub-menu with the sub-item's label. Routes play no part.

use admin_types::{MenuNode, PermissionGrant};
use serde::{Deserialize, Serialize};

use crate::catalog::MenuCatalog;

/// What to do with a top-level section once every item under it was filtered out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptySectionPolicy {
    /// Keep the section with no items; the renderer shows a bare heading.
    #[default]
    Retain,
    /// Drop the section entirely.
    Prune,
}

/// Build the visible menu for `grant`. The catalog is never mutated.
pub fn filter_catalog(catalog: &MenuCatalog, grant: &PermissionGrant, policy: EmptySectionPolicy) -> Vec<MenuNode> {
    catalog
        .sections()
        .iter()
        .filter_map(|section| {
            let items: Vec<MenuNode> = section
                .children
                .iter()
                .filter_map(|item| filter_item(item, grant))
                .collect();
            if items.is_empty() && policy == EmptySectionPolicy::Prune {
                return None;
            }
            Some(MenuNode {
                children: items,
                ..section.clone()
            })
        })
        .collect()
}

fn filter_item(item: &MenuNode, grant: &PermissionGrant) -> Option<MenuNode> {
    let granted = grant.menu(&item.label)?;
    if !item.has_children() {
        return Some(item.clone());
    }

    let sub_items: Vec<MenuNode> = item
        .children
        .iter()
        .filter(|sub| granted.grants_sub_menu(&sub.label))
        .cloned()
        .collect();
    // An expandable item with nothing to expand is not shown.
    if sub_items.is_empty() {
        return None;
    }
    Some(MenuNode {
        children: sub_items,
        ..item.clone()
    })
}
