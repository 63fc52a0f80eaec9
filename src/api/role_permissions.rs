use crate::models::RolePermission;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const ROLE_PERMISSIONS: &str = "role permissions";
const ROLE_PERMISSION: &str = "role-permission association";

/// `GET /api/role-permission/role/{roleId}`
pub async fn by_role(api: &ApiClient, role_id: &str) -> Result<Vec<RolePermission>, ApiError> {
    api.get(
        &["api", "role-permission", "role", role_id],
        Target::new(Action::Load, ROLE_PERMISSIONS),
    )
    .await
}

/// `POST /api/role-permission/role/{roleId}/permission/{permissionId}`
///
/// The backend may or may not echo the created record.
pub async fn create(
    api: &ApiClient,
    role_id: &str,
    permission_id: &str,
) -> Result<Option<RolePermission>, ApiError> {
    api.post_empty(
        &["api", "role-permission", "role", role_id, "permission", permission_id],
        Target::new(Action::Create, ROLE_PERMISSION),
        Auth::Session,
    )
    .await
}

/// `DELETE /api/role-permission/{id}`
pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&["api", "role-permission", id], Target::new(Action::Delete, ROLE_PERMISSION))
        .await
}
