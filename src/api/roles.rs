use crate::models::Role;
use crate::models::role::RolePayload;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const ROLES: &str = "roles";
const ROLE: &str = "role";

pub async fn list(api: &ApiClient) -> Result<Vec<Role>, ApiError> {
    api.get(&["api", "roles"], Target::new(Action::Load, ROLES)).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<Role, ApiError> {
    api.get(&["api", "roles", id], Target::new(Action::Load, ROLE)).await
}

pub async fn create(api: &ApiClient, role: &RolePayload<'_>) -> Result<Role, ApiError> {
    api.post(&["api", "roles"], role, Target::new(Action::Create, ROLE), Auth::Session)
        .await
}

pub async fn update(api: &ApiClient, id: &str, role: &RolePayload<'_>) -> Result<Role, ApiError> {
    api.put(&["api", "roles", id], role, Target::new(Action::Update, ROLE)).await
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&["api", "roles", id], Target::new(Action::Delete, ROLE)).await
}
