use crate::models::UserRole;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const ASSIGNMENTS: &str = "role assignments";
const USER_ROLES: &str = "user roles";
const ROLE_USERS: &str = "role users";
const ASSIGNMENT: &str = "role assignment";

fn normalize(list: Vec<UserRole>) -> Vec<UserRole> {
    list.into_iter().map(UserRole::normalized).collect()
}

/// `GET /api/user-role`
pub async fn list(api: &ApiClient) -> Result<Vec<UserRole>, ApiError> {
    api.get(&["api", "user-role"], Target::new(Action::Load, ASSIGNMENTS))
        .await
        .map(normalize)
}

/// `GET /api/user-role/user/{userId}`
pub async fn by_user(api: &ApiClient, user_id: &str) -> Result<Vec<UserRole>, ApiError> {
    api.get(&["api", "user-role", "user", user_id], Target::new(Action::Load, USER_ROLES))
        .await
        .map(normalize)
}

/// `GET /api/user-role/role/{roleId}`
pub async fn by_role(api: &ApiClient, role_id: &str) -> Result<Vec<UserRole>, ApiError> {
    api.get(&["api", "user-role", "role", role_id], Target::new(Action::Load, ROLE_USERS))
        .await
        .map(normalize)
}

/// `POST /api/user-role/user/{userId}/role/{roleId}`
pub async fn assign(api: &ApiClient, user_id: &str, role_id: &str) -> Result<Option<UserRole>, ApiError> {
    api.post_empty::<UserRole>(
        &["api", "user-role", "user", user_id, "role", role_id],
        Target::new(Action::Assign, "role"),
        Auth::Session,
    )
    .await
    .map(|created| created.map(UserRole::normalized))
}

/// `DELETE /api/user-role/{id}`
pub async fn remove(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&["api", "user-role", id], Target::new(Action::Revoke, ASSIGNMENT)).await
}
