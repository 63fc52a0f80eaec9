use askama::Template;

use crate::models::{HttpMethod, Permission};
use crate::selection::SelectionPanel;
use crate::views::stats::PermissionStats;
use super::PageContext;

pub struct PermissionRow {
    pub id: String,
    pub url: String,
    pub method: &'static str,
    pub badge_class: &'static str,
}

impl From<&Permission> for PermissionRow {
    fn from(p: &Permission) -> Self {
        Self {
            id: p.id.clone(),
            url: p.url.clone(),
            method: p.method.as_str(),
            badge_class: p.method.badge_class(),
        }
    }
}

#[derive(Template)]
#[template(path = "permissions/list.html")]
pub struct PermissionListTemplate {
    pub ctx: PageContext,
    pub rows: Vec<PermissionRow>,
    pub error: Option<String>,
    pub query: String,
    pub stats: PermissionStats,
    pub selection: Option<SelectionPanel>,
}

#[derive(Template)]
#[template(path = "permissions/form.html")]
pub struct PermissionFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub url: String,
    pub method: String,
    pub methods: [HttpMethod; 5],
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "permissions/delete.html")]
pub struct PermissionDeleteTemplate {
    pub ctx: PageContext,
    pub permission: PermissionRow,
}
