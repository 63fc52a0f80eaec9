use serde::{Deserialize, Serialize};

use super::role::Role;
use super::user::User;

/// Join record assigning a role to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRole {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "roleId", default)]
    pub role_id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UserRole {
    /// Fill missing ids from the embedded records so callers can join on ids alone.
    pub fn normalized(mut self) -> Self {
        if self.user_id.is_empty() {
            if let Some(user) = &self.user {
                self.user_id = user.id.clone();
            }
        }
        if self.role_id.is_empty() {
            if let Some(role) = &self.role {
                self.role_id = role.id.clone();
            }
        }
        self
    }
}

/// Form data from the assign-role form.
#[derive(Debug, Deserialize)]
pub struct AssignForm {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub role_id: String,
    pub csrf_token: String,
}
