use crate::models::User;
use crate::models::user::UserPayload;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const USERS: &str = "users";
const USER: &str = "user";

pub async fn list(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get(&["api", "users"], Target::new(Action::Load, USERS)).await
}

pub async fn get(api: &ApiClient, id: &str) -> Result<User, ApiError> {
    api.get(&["api", "users", id], Target::new(Action::Load, USER)).await
}

pub async fn create(api: &ApiClient, user: &UserPayload<'_>) -> Result<User, ApiError> {
    api.post(&["api", "users"], user, Target::new(Action::Create, USER), Auth::Session)
        .await
}

pub async fn update(api: &ApiClient, id: &str, user: &UserPayload<'_>) -> Result<User, ApiError> {
    api.put(&["api", "users", id], user, Target::new(Action::Update, USER)).await
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
    api.delete(&["api", "users", id], Target::new(Action::Delete, USER)).await
}
