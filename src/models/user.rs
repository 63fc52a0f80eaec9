use serde::{Deserialize, Serialize};

/// A back-office user as returned by `/api/users`.
///
/// The password is write-only: it is sent on create/update and never read back.
/// `role` and `active` are optional in the backend payload and defaulted here so
/// call sites never have to guess.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl User {
    /// Users without an explicit flag are treated as active.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .map(|r| r.trim().to_lowercase().starts_with("admin"))
            .unwrap_or(false)
    }

    /// Initials for the avatar bubble: first letter of each word.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() { "?".to_string() } else { initials }
    }
}

/// Form data from create/edit user forms.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub csrf_token: String,
}

/// Body sent to `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Serialize)]
pub struct UserPayload<'a> {
    pub name: &'a str,
    pub email: &'a str,
    /// Omitted on update when left blank so the stored password is kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

impl UserForm {
    pub fn payload(&self) -> UserPayload<'_> {
        let password = self.password.as_str();
        UserPayload {
            name: self.name.trim(),
            email: self.email.trim(),
            password: (!password.is_empty()).then_some(password),
        }
    }
}

/// Registration form (public).
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub csrf_token: String,
}

impl RegisterForm {
    pub fn payload(&self) -> UserPayload<'_> {
        UserPayload {
            name: self.name.trim(),
            email: self.email.trim(),
            password: Some(self.password.as_str()),
        }
    }
}

/// The signed-in user, serialized into the session next to the bearer token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

impl SessionUser {
    /// Name to greet the user with: display name, else the local part of the email.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        self.email
            .split('@')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_mongo_and_plain_ids() {
        let u: User = serde_json::from_str(r#"{"_id":"u1","name":"Juan Pérez","email":"juan@x.co"}"#).unwrap();
        assert_eq!(u.id, "u1");
        let u: User = serde_json::from_str(r#"{"id":"u2","name":"Ana","email":"ana@x.co"}"#).unwrap();
        assert_eq!(u.id, "u2");
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let u: User = serde_json::from_str(r#"{"_id":"u1","name":"Ana","email":"a@x.co","password":"hash"}"#).unwrap();
        assert!(u.is_active());
        assert!(!u.is_admin());
        assert_eq!(u.role, None);
    }

    #[test]
    fn admin_detection_is_case_insensitive() {
        let u = User { role: Some("Administrador".into()), ..User::default() };
        assert!(u.is_admin());
        let u = User { role: Some("cliente".into()), ..User::default() };
        assert!(!u.is_admin());
    }

    #[test]
    fn initials_from_name() {
        let u = User { name: "juan pérez".into(), ..User::default() };
        assert_eq!(u.initials(), "JP");
        assert_eq!(User::default().initials(), "?");
    }

    #[test]
    fn blank_password_is_not_sent_on_update() {
        let form = UserForm {
            name: " Ana ".into(),
            email: "ana@x.co".into(),
            password: String::new(),
            csrf_token: "t".into(),
        };
        let json = serde_json::to_value(form.payload()).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Ana", "email": "ana@x.co"}));
    }

    #[test]
    fn session_user_display_name_falls_back_to_email() {
        let u = SessionUser { email: "maria@viajes.co".into(), ..SessionUser::default() };
        assert_eq!(u.display_name(), "maria");
        let u: SessionUser = serde_json::from_str(r#"{"_id":"9","name":"Maria"}"#).unwrap();
        assert_eq!(u.id, "9");
        assert_eq!(u.display_name(), "Maria");
    }
}
