use askama::Template;

use crate::selection::SelectionPanel;
use crate::views::stats::RolePermissionStats;
use super::PageContext;

pub struct RoleOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

pub struct GrantRow {
    pub id: String,
    pub url: String,
    pub method: &'static str,
    pub badge_class: &'static str,
    pub revoke_href: String,
}

#[derive(Template)]
#[template(path = "role_permissions/list.html")]
pub struct RolePermissionsTemplate {
    pub ctx: PageContext,
    pub roles: Vec<RoleOption>,
    pub roles_error: Option<String>,
    pub role_id: String,
    pub role_name: String,
    pub rows: Vec<GrantRow>,
    pub error: Option<String>,
    pub query: String,
    pub stats: RolePermissionStats,
    /// Permission chosen for the grant form; empty until one is picked.
    pub permission_id: String,
    pub permission_label: Option<String>,
    pub choose_permission_href: String,
    pub selection: Option<SelectionPanel>,
}

#[derive(Template)]
#[template(path = "role_permissions/revoke.html")]
pub struct RevokeGrantTemplate {
    pub ctx: PageContext,
    pub id: String,
    pub role_id: String,
    pub role_name: String,
    pub url: String,
    pub method: &'static str,
}
