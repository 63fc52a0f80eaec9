use crate::models::Permission;
use crate::models::permission::PermissionPayload;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const PERMISSIONS: &str = "permissions";
const PERMISSION: &str = "permission";

pub async fn list(api: &ApiClient) -> Result<Vec<Permission>, ApiError> {
    api.get(&["api", "permissions"], Target::new(Action::Load, PERMISSIONS)).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Permission, ApiError> {
    api.get(&["api", "permissions", id], Target::new(Action::Load, PERMISSION)).await
}

pub async fn create(api: &ApiClient, permission: &PermissionPayload<'_>) -> Result<Permission, ApiError> {
    api.post(
        &["api", "permissions"],
        permission,
        Target::new(Action::Create, PERMISSION),
        Auth::Session,
    )
    .await
}

pub async fn update(
    api: &ApiClient,
    id: &str,
    permission: &PermissionPayload<'_>,
) -> Result<Permission, ApiError> {
    api.put(&["api", "permissions", id], permission, Target::new(Action::Update, PERMISSION))
        .await
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&["api", "permissions", id], Target::new(Action::Delete, PERMISSION)).await
}
