//! The canonical in-memory copy of the backend collections for one request.
//!
//! Pages read through the selectors below instead of keeping their own copies;
//! the only way to change what a `Directory` holds is `refresh()`.

use crate::api::{ApiClient, ApiError, permissions, roles, user_roles, users};
use crate::models::{Permission, Role, User, UserRole};
use crate::views::{ListState, ListView};

#[derive(Debug, Default, Clone)]
pub struct Directory {
    users: ListView<User>,
    roles: ListView<Role>,
    permissions: ListView<Permission>,
    user_roles: ListView<UserRole>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fresh directory.
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let mut directory = Self::new();
        directory.refresh(api).await?;
        Ok(directory)
    }

    /// Fetch every collection again, concurrently. Each collection settles on its
    /// own; one failing does not hide the others. A 401 from any of them is returned.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.users.begin();
        self.roles.begin();
        self.permissions.begin();
        self.user_roles.begin();

        let (u, r, p, ur) = tokio::join!(
            users::list(api),
            roles::list(api),
            permissions::list(api),
            user_roles::list(api),
        );

        let settled = [
            self.users.settle(u),
            self.roles.settle(r),
            self.permissions.settle(p),
            self.user_roles.settle(ur),
        ];
        settled.into_iter().collect()
    }

    pub fn users(&self) -> &[User] {
        self.users.items()
    }

    pub fn roles(&self) -> &[Role] {
        self.roles.items()
    }

    pub fn permissions(&self) -> &[Permission] {
        self.permissions.items()
    }

    pub fn user_roles(&self) -> &[UserRole] {
        self.user_roles.items()
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users().iter().find(|u| u.id == id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles().iter().find(|r| r.id == id)
    }

    pub fn permission(&self, id: &str) -> Option<&Permission> {
        self.permissions().iter().find(|p| p.id == id)
    }

    pub fn users_state(&self) -> &ListState<User> {
        self.users.state()
    }

    pub fn roles_state(&self) -> &ListState<Role> {
        self.roles.state()
    }

    pub fn permissions_state(&self) -> &ListState<Permission> {
        self.permissions.state()
    }

    pub fn user_roles_state(&self) -> &ListState<UserRole> {
        self.user_roles.state()
    }
}
