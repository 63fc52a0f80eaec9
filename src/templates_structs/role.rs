use askama::Template;

use crate::models::Role;
use crate::selection::SelectionPanel;
use crate::views::stats::RoleStats;
use super::PageContext;

pub struct RoleRow {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Permission count badge text.
    pub permissions: String,
}

#[derive(Template)]
#[template(path = "roles/list.html")]
pub struct RoleListTemplate {
    pub ctx: PageContext,
    pub rows: Vec<RoleRow>,
    pub error: Option<String>,
    pub query: String,
    pub stats: RoleStats,
    pub selection: Option<SelectionPanel>,
}

#[derive(Template)]
#[template(path = "roles/form.html")]
pub struct RoleFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub name: String,
    pub description: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "roles/delete.html")]
pub struct RoleDeleteTemplate {
    pub ctx: PageContext,
    pub role: Role,
}
