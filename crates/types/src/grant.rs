use serde::{Deserialize, Serialize};

/// Server-reported set of menus and sub-menus visible to the current user.
///
/// Read-only input to the permission filter. Unknown fields on the wire are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    #[serde(default)]
    pub menus: Vec<GrantedMenu>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedMenu {
    pub name: String,
    #[serde(default, rename = "subMenus")]
    pub sub_menus: Vec<GrantedSubMenu>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedSubMenu {
    pub name: String,
}

impl PermissionGrant {
    /// First granted menu whose name equals `name`.
    pub fn menu(&self, name: &str) -> Option<&GrantedMenu> {
        self.menus.iter().find(|menu| menu.name == name)
    }
}

impl GrantedMenu {
    pub fn new<I, S>(name: impl Into<String>, sub_menus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            sub_menus: sub_menus
                .into_iter()
                .map(|name| GrantedSubMenu { name: name.into() })
                .collect(),
        }
    }

    pub fn grants_sub_menu(&self, name: &str) -> bool {
        self.sub_menus.iter().any(|sub| sub.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_shape_and_ignores_extra_fields() {
        let grant: PermissionGrant = serde_json::from_str(
            r#"{"menus":[{"name":"Menu Management","code":"M01","subMenus":[{"name":"Menus","code":"S01"}]},{"name":"Dashboard"}]}"#,
        )
        .expect("decode grant");
        let menu = grant.menu("Menu Management").expect("menu present");
        assert!(menu.grants_sub_menu("Menus"));
        assert!(!menu.grants_sub_menu("Sub Menus"));
        assert!(grant.menu("Dashboard").unwrap().sub_menus.is_empty());
        assert!(grant.menu("Website Settings").is_none());
    }
}
