use serde::{Deserialize, Serialize};

use crate::models::SessionUser;
use super::client::{ApiClient, Auth};
use super::error::{Action, ApiError, Target};

const CREDENTIALS: &str = "these credentials";
const CODE: &str = "this code";
const PROVIDER: &str = "this provider";

/// Providers accepted by the federated login exchange.
pub const PROVIDERS: [&str; 3] = ["google", "github", "microsoft"];

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct Validate2faRequest<'a> {
    email: &'a str,
    #[serde(rename = "code2FA")]
    code: &'a str,
    #[serde(rename = "sessionId")]
    session_id: &'a str,
}

/// Response of both login steps. Step one carries `session_id`, step two `token` and `user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// Response of `POST /api/auth/firebase-login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FederatedResponse {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub provider: String,
    #[serde(rename = "systemUserId", default)]
    pub system_user_id: String,
}

impl FederatedResponse {
    pub fn into_session_user(self) -> SessionUser {
        let id = if self.system_user_id.is_empty() { self.uid } else { self.system_user_id };
        SessionUser {
            id,
            name: self.name,
            email: self.email,
            picture: (!self.picture.is_empty()).then_some(self.picture),
            provider: (!self.provider.is_empty()).then_some(self.provider),
        }
    }
}

/// Step one: `POST /api/public/security/login`. The backend emails a 2FA code
/// and answers with the session id to validate it against.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let target = Target::new(Action::Login, CREDENTIALS);
    api.post(
        &["api", "public", "security", "login"],
        &LoginRequest { email, password },
        target,
        Auth::Public,
    )
    .await
    .map_err(|e| with_fallback(e, "Invalid credentials"))
}

/// Step two: `POST /api/public/security/validate2fa`.
pub async fn validate_2fa(
    api: &ApiClient,
    email: &str,
    code: &str,
    session_id: &str,
) -> Result<LoginResponse, ApiError> {
    let target = Target::new(Action::Verify, CODE);
    api.post(
        &["api", "public", "security", "validate2fa"],
        &Validate2faRequest { email, code, session_id },
        target,
        Auth::Public,
    )
    .await
    .map_err(|e| with_fallback(e, "Incorrect or expired code"))
}

/// Exchange a federated identity token for the backend's user record.
pub async fn federated_login(api: &ApiClient, id_token: &str) -> Result<FederatedResponse, ApiError> {
    let target = Target::new(Action::Login, PROVIDER);
    api.post_empty::<FederatedResponse>(&["api", "auth", "firebase-login"], target, Auth::Bearer(id_token))
        .await?
        .ok_or_else(|| ApiError::failed(target, None, Some("No response from server".to_string())))
}

pub fn is_supported_provider(provider: &str) -> bool {
    PROVIDERS.contains(&provider)
}

/// Credential failures without a backend message get a friendlier default.
fn with_fallback(err: ApiError, fallback: &str) -> ApiError {
    match err {
        ApiError::Failed { target, status, message: None } => {
            ApiError::failed(target, status, Some(fallback.to_string()))
        }
        other => other,
    }
}
