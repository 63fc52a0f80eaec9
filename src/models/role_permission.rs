use serde::{Deserialize, Serialize};

use super::permission::Permission;
use super::role::Role;

/// Join record granting a permission to a role.
///
/// Both sides are optional: a dangling reference renders as a fallback label
/// instead of failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RolePermission {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub permission: Option<Permission>,
}

impl RolePermission {
    pub fn role_name(&self) -> &str {
        self.role.as_ref().map(|r| r.name.as_str()).unwrap_or("Role not found")
    }

    pub fn permission_url(&self) -> &str {
        self.permission.as_ref().map(|p| p.url.as_str()).unwrap_or("Permission not found")
    }

    pub fn method_label(&self) -> &'static str {
        self.permission.as_ref().map(|p| p.method.as_str()).unwrap_or("N/A")
    }
}

/// Form data from the grant-permission form.
#[derive(Debug, Deserialize)]
pub struct GrantForm {
    #[serde(default)]
    pub role_id: String,
    #[serde(default)]
    pub permission_id: String,
    pub csrf_token: String,
}

/// Form data from the revoke confirmation.
#[derive(Debug, Deserialize)]
pub struct RevokeGrantForm {
    #[serde(default)]
    pub role_id: String,
    pub csrf_token: String,
}
