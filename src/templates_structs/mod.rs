// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_user, take_notice};
use crate::views::Notice;

mod auth;
mod dashboard;
mod messages;
mod permission;
mod role;
mod role_permission;
mod user;
mod user_role;

pub use self::auth::{LoginTemplate, RegisterTemplate, Verify2faTemplate};
pub use self::dashboard::{CountCard, DashboardTemplate};
pub use self::messages::MessagesTemplate;
pub use self::permission::{PermissionDeleteTemplate, PermissionFormTemplate, PermissionListTemplate, PermissionRow};
pub use self::role::{RoleDeleteTemplate, RoleFormTemplate, RoleListTemplate, RoleRow};
pub use self::role_permission::{GrantRow, RevokeGrantTemplate, RoleOption, RolePermissionsTemplate};
pub use self::user::{UserDeleteTemplate, UserFormTemplate, UserListTemplate, UserRow};
pub use self::user_role::{LookupRow, UserRolesTemplate};

pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

const NAV: [(&str, &str); 7] = [
    ("Overview", "/dashboard"),
    ("Users", "/dashboard/users"),
    ("Roles", "/dashboard/roles"),
    ("Permissions", "/dashboard/permissions"),
    ("Role permissions", "/dashboard/role-permissions"),
    ("User roles", "/dashboard/user-roles"),
    ("Messages", "/dashboard/messages"),
];

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.user_name`, `ctx.notice`, etc.
pub struct PageContext {
    pub user_name: String,
    pub avatar_initial: String,
    pub notice: Option<Notice>,
    pub csrf_token: String,
    pub nav: Vec<NavLink>,
}

impl PageContext {
    pub fn build(session: &Session, current_path: &str) -> Self {
        let user_name = get_user(session)
            .map(|u| u.display_name())
            .unwrap_or_else(|| "User".to_string());
        let avatar_initial = user_name.chars().next().unwrap_or('?').to_uppercase().to_string();
        let nav = NAV
            .iter()
            .map(|(label, href)| NavLink { label, href, active: *href == current_path })
            .collect();
        Self {
            user_name,
            avatar_initial,
            notice: take_notice(session),
            csrf_token: csrf::get_or_create_token(session),
            nav,
        }
    }
}
