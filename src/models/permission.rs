use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP method a permission authorizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// CSS modifier for the method badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            HttpMethod::Get => "badge-get",
            HttpMethod::Post => "badge-post",
            HttpMethod::Put => "badge-put",
            HttpMethod::Delete => "badge-delete",
            HttpMethod::Patch => "badge-patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unsupported method '{}'", s.trim()))
    }
}

/// An authorizable API route as returned by `/api/permissions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
}

/// Form data from create/edit permission forms.
#[derive(Debug, Deserialize)]
pub struct PermissionForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: String,
    pub csrf_token: String,
}

/// Body sent to `POST /api/permissions` and `PUT /api/permissions/{id}`.
#[derive(Debug, Serialize)]
pub struct PermissionPayload<'a> {
    pub url: &'a str,
    pub method: HttpMethod,
}
