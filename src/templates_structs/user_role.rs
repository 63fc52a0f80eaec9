use askama::Template;

use crate::assignment::AssignmentRow;
use crate::selection::SelectionPanel;
use super::PageContext;

/// A user found by name with their joined role names.
pub struct LookupRow {
    pub name: String,
    pub email: String,
    pub roles: String,
}

#[derive(Template)]
#[template(path = "user_roles/list.html")]
pub struct UserRolesTemplate {
    pub ctx: PageContext,
    pub rows: Vec<AssignmentRow>,
    pub error: Option<String>,
    pub query: String,
    pub user_id: String,
    pub user_label: Option<String>,
    /// Current roles of the chosen user, from the assignment list.
    pub user_current_roles: Vec<String>,
    pub role_id: String,
    pub role_label: Option<String>,
    pub choose_user_href: String,
    pub choose_role_href: String,
    pub selection: Option<SelectionPanel>,
    /// Name lookup; inactive when `lookup` is empty.
    pub lookup: String,
    pub lookup_rows: Vec<LookupRow>,
    pub lookup_error: Option<String>,
    /// Holders of one role; inactive when `holders_role` is `None`.
    pub holders_role: Option<String>,
    pub holders: Vec<AssignmentRow>,
    pub holders_error: Option<String>,
    pub role_options: Vec<(String, String)>,
}
