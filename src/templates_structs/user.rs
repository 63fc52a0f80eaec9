use askama::Template;

use crate::models::User;
use crate::views::stats::UserStats;
use super::PageContext;

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub initials: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone().filter(|r| !r.is_empty()).unwrap_or_else(|| "N/A".to_string()),
            active: u.is_active(),
            initials: u.initials(),
        }
    }
}

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub rows: Vec<UserRow>,
    pub error: Option<String>,
    pub query: String,
    pub stats: UserStats,
}

#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub is_edit: bool,
    pub name: String,
    pub email: String,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "users/delete.html")]
pub struct UserDeleteTemplate {
    pub ctx: PageContext,
    pub user: User,
}
