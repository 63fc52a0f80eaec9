use std::fmt;

/// What the caller was trying to do when a backend call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update,
    Delete,
    Assign,
    Revoke,
    Login,
    Verify,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Assign => "assign",
            Action::Revoke => "revoke",
            Action::Login => "sign in with",
            Action::Verify => "verify",
        }
    }
}

/// The operation and resource a request belongs to, used to build fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub action: Action,
    pub resource: &'static str,
}

impl Target {
    pub const fn new(action: Action, resource: &'static str) -> Self {
        Self { action, resource }
    }
}

/// Every backend failure collapses into one of these two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Backend answered 401: credentials must be cleared and the user sent to the login screen.
    Unauthorized,
    Failed {
        target: Target,
        status: Option<u16>,
        /// Message supplied by the backend, if any.
        message: Option<String>,
    },
}

impl ApiError {
    pub fn failed(target: Target, status: Option<u16>, message: Option<String>) -> Self {
        ApiError::Failed { target, status, message }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Failed { status, .. } => *status,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Your session has expired, please sign in again"),
            ApiError::Failed { message: Some(msg), .. } => write!(f, "{msg}"),
            ApiError::Failed { target, .. } => {
                write!(f, "Could not {} {}", target.action.as_str(), target.resource)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Extract a human-readable message from an error body.
///
/// Accepts `{"message": "..."}`, `{"error": "..."}`, a bare JSON string, or short plain text.
/// HTML error pages and empty bodies yield `None`.
pub fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let msg = match &value {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(map) => map
                .get("message")
                .or_else(|| map.get("error"))
                .and_then(|v| v.as_str()),
            _ => None,
        };
        return msg
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
    }

    if trimmed.starts_with('<') || trimmed.len() > 300 {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: Target = Target::new(Action::Load, "roles");

    #[test]
    fn display_prefers_backend_message() {
        let err = ApiError::failed(ROLES, Some(409), Some("Role already exists".into()));
        assert_eq!(err.to_string(), "Role already exists");
    }

    #[test]
    fn display_falls_back_to_generic_message() {
        let err = ApiError::failed(ROLES, Some(500), None);
        assert_eq!(err.to_string(), "Could not load roles");

        let err = ApiError::failed(Target::new(Action::Delete, "permission"), None, None);
        assert_eq!(err.to_string(), "Could not delete permission");
    }

    #[test]
    fn message_from_json_object() {
        assert_eq!(backend_message(r#"{"message":"Email taken"}"#).as_deref(), Some("Email taken"));
        assert_eq!(backend_message(r#"{"error":"Bad id"}"#).as_deref(), Some("Bad id"));
        assert_eq!(backend_message(r#"{"status":500}"#), None);
        assert_eq!(backend_message(r#"{"message":"  "}"#), None);
    }

    #[test]
    fn message_from_string_and_text() {
        assert_eq!(backend_message(r#""Duplicate key""#).as_deref(), Some("Duplicate key"));
        assert_eq!(backend_message("User not found").as_deref(), Some("User not found"));
        assert_eq!(backend_message("<html><body>502</body></html>"), None);
        assert_eq!(backend_message("   "), None);
    }

    #[test]
    fn unauthorized_reports_401() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
    }
}
