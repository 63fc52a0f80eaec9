use serde::{Deserialize, Serialize};

/// A role as returned by `/api/roles`. Names are unique in practice, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Form data from create/edit role forms.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub csrf_token: String,
}

/// Body sent to `POST /api/roles` and `PUT /api/roles/{id}`.
#[derive(Debug, Serialize)]
pub struct RolePayload<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl RoleForm {
    pub fn payload(&self) -> RolePayload<'_> {
        RolePayload {
            name: self.name.trim(),
            description: self.description.trim(),
        }
    }
}
