//! Assignment orchestration for the two join resources.
//!
//! Every mutation goes straight to the backend and nothing is patched locally;
//! the page the caller redirects to loads the lists fresh. Failures become
//! notices. Only a backend 401 is returned as `Err`.

use std::collections::HashMap;

use futures::future::join_all;

use crate::api::{ApiClient, ApiError, role_permissions, user_roles};
use crate::auth::validate::validate_selection;
use crate::models::{Role, User, UserRole};
use crate::selection::matches;
use crate::views::Notice;

/// Result of an assign/revoke: the notice to flash on the next page.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub notice: Notice,
}

impl Outcome {
    fn done(notice: Notice) -> Self {
        Self { notice }
    }

    pub fn succeeded(&self) -> bool {
        !self.notice.is_error()
    }
}

fn failure(title: &str, err: ApiError) -> Result<Outcome, ApiError> {
    if err.is_unauthorized() {
        return Err(err);
    }
    log::warn!("{title}: {err}");
    Ok(Outcome::done(Notice::error(title, err.to_string())))
}

/// Assign a role to a user.
pub async fn assign_role(api: &ApiClient, user_id: &str, role_id: &str) -> Result<Outcome, ApiError> {
    if let Some(msg) = validate_selection(user_id, role_id, "user", "role") {
        return Ok(Outcome::done(Notice::error("Selection required", msg)));
    }

    if let Err(e) = user_roles::assign(api, user_id, role_id).await {
        return failure("Could not assign role", e);
    }
    log::info!("Assigned role {role_id} to user {user_id}");
    Ok(Outcome::done(Notice::success("Role assigned", "The role was assigned to the user.")))
}

/// Remove a user-role link by its own id.
pub async fn revoke_user_role(api: &ApiClient, id: &str) -> Result<Outcome, ApiError> {
    if let Err(e) = user_roles::remove(api, id).await {
        return failure("Could not remove role assignment", e);
    }
    log::info!("Removed role assignment {id}");
    Ok(Outcome::done(Notice::success("Assignment removed", "The role was removed from the user.")))
}

/// Grant a permission to a role.
pub async fn grant_permission(
    api: &ApiClient,
    role_id: &str,
    permission_id: &str,
) -> Result<Outcome, ApiError> {
    if let Some(msg) = validate_selection(role_id, permission_id, "role", "permission") {
        return Ok(Outcome::done(Notice::error("Selection required", msg)));
    }

    if let Err(e) = role_permissions::create(api, role_id, permission_id).await {
        return failure("Could not grant permission", e);
    }
    log::info!("Granted permission {permission_id} to role {role_id}");
    Ok(Outcome::done(Notice::success("Permission granted", "The permission was added to the role.")))
}

/// Revoke a role-permission link.
pub async fn revoke_role_permission(
    api: &ApiClient,
    id: &str,
    role_id: &str,
) -> Result<Outcome, ApiError> {
    if let Err(e) = role_permissions::delete(api, id).await {
        return failure("Could not revoke permission", e);
    }
    log::info!("Revoked role-permission {id} from role {role_id}");
    Ok(Outcome::done(Notice::success("Permission revoked", "The permission was removed from the role.")))
}

/// An assignment joined against the user and role collections.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub id: String,
    pub user_id: String,
    pub role_id: String,
    pub user_name: String,
    pub user_email: String,
    pub role_name: String,
    pub role_description: String,
}

/// Resolve each assignment's user and role. Embedded records win over the
/// collections; dangling references get fallback text.
pub fn cross_reference(assignments: &[UserRole], users: &[User], roles: &[Role]) -> Vec<AssignmentRow> {
    let users_by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let roles_by_id: HashMap<&str, &Role> = roles.iter().map(|r| (r.id.as_str(), r)).collect();

    assignments
        .iter()
        .map(|ur| {
            let user = ur.user.as_ref().or_else(|| users_by_id.get(ur.user_id.as_str()).copied());
            let role = ur.role.as_ref().or_else(|| roles_by_id.get(ur.role_id.as_str()).copied());
            AssignmentRow {
                id: ur.id.clone(),
                user_id: ur.user_id.clone(),
                role_id: ur.role_id.clone(),
                user_name: user.map(|u| u.name.clone()).unwrap_or_else(|| "User not found".to_string()),
                user_email: user
                    .map(|u| u.email.clone())
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
                role_name: role.map(|r| r.name.clone()).unwrap_or_else(|| "Role not found".to_string()),
                role_description: role
                    .map(|r| r.description.clone())
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "N/A".to_string()),
            }
        })
        .collect()
}

/// Search over joined rows by user name, email or role name.
pub fn filter_rows<'a>(rows: &'a [AssignmentRow], query: &str) -> Vec<&'a AssignmentRow> {
    rows.iter()
        .filter(|r| matches(query, &[r.user_name.as_str(), r.user_email.as_str(), r.role_name.as_str()]))
        .collect()
}

/// A user found by name together with the names of their roles.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithRoles {
    pub user: User,
    /// Comma separated role names, `"No roles assigned"` when empty, `"n/a"` when the lookup failed.
    pub roles: String,
}

/// Filter `users` by name, then fetch each match's roles concurrently.
pub async fn search_users_with_roles(
    api: &ApiClient,
    query: &str,
    users: &[User],
    roles: &[Role],
) -> Result<Vec<UserWithRoles>, ApiError> {
    let roles_by_id: HashMap<&str, &Role> = roles.iter().map(|r| (r.id.as_str(), r)).collect();
    let found: Vec<&User> = users.iter().filter(|u| matches(query, &[u.name.as_str()])).collect();

    let lookups = join_all(found.iter().map(|u| user_roles::by_user(api, &u.id))).await;

    let mut out = Vec::with_capacity(found.len());
    for (user, result) in found.into_iter().zip(lookups) {
        let roles = match result {
            Ok(assigned) if assigned.is_empty() => "No roles assigned".to_string(),
            Ok(assigned) => assigned
                .iter()
                .map(|ur| {
                    ur.role
                        .as_ref()
                        .or_else(|| roles_by_id.get(ur.role_id.as_str()).copied())
                        .map(|r| r.name.as_str())
                        .unwrap_or("Role not found")
                })
                .collect::<Vec<_>>()
                .join(", "),
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
            Err(e) => {
                log::warn!("Role lookup for user {} failed: {e}", user.id);
                "n/a".to_string()
            }
        };
        out.push(UserWithRoles { user: user.clone(), roles });
    }
    Ok(out)
}

/// Users holding `role_id`, straight from the role-scoped endpoint.
pub async fn users_by_role(
    api: &ApiClient,
    role_id: &str,
    users: &[User],
    roles: &[Role],
) -> Result<Vec<AssignmentRow>, ApiError> {
    let assignments = user_roles::by_role(api, role_id).await?;
    Ok(cross_reference(&assignments, users, roles))
}

/// Number of permissions granted to each role. A failed per-role fetch maps to `None`.
pub async fn permission_counts(api: &ApiClient, roles: &[Role]) -> Result<HashMap<String, Option<usize>>, ApiError> {
    let results = join_all(roles.iter().map(|r| role_permissions::by_role(api, &r.id))).await;

    let mut counts = HashMap::with_capacity(roles.len());
    for (role, result) in roles.iter().zip(results) {
        let count = match result {
            Ok(grants) => Some(grants.len()),
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
            Err(e) => {
                log::warn!("Permission count for role {} failed: {e}", role.id);
                None
            }
        };
        counts.insert(role.id.clone(), count);
    }
    Ok(counts)
}
