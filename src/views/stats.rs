//! Counts and percentages derived from already-fetched collections.
//!
//! Everything here is recomputed from scratch on every load.

use std::collections::HashSet;

use crate::models::{HttpMethod, Permission, RolePermission, User, UserRole};

/// `part` as a share of `total`, one decimal place. `"0.0"` for an empty total.
pub fn percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", part as f64 * 100.0 / total as f64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleStats {
    pub total_roles: usize,
    pub total_users: usize,
    pub users_with_roles: usize,
    pub users_without_roles: usize,
    pub with_roles_pct: String,
    pub without_roles_pct: String,
}

impl RoleStats {
    /// A user counts as "with roles" if at least one assignment references them.
    pub fn compute(role_count: usize, users: &[User], assignments: &[UserRole]) -> Self {
        let known: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
        let assigned: HashSet<&str> = assignments
            .iter()
            .map(|ur| ur.user_id.as_str())
            .filter(|id| known.contains(id))
            .collect();

        let total_users = users.len();
        let users_with_roles = assigned.len();
        let users_without_roles = total_users - users_with_roles;
        Self {
            total_roles: role_count,
            total_users,
            users_with_roles,
            users_without_roles,
            with_roles_pct: percent(users_with_roles, total_users),
            without_roles_pct: percent(users_without_roles, total_users),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionStats {
    pub total: usize,
    pub get: usize,
    pub post: usize,
    pub other: usize,
    pub get_pct: String,
    pub post_pct: String,
    pub other_pct: String,
}

impl PermissionStats {
    pub fn compute(permissions: &[Permission]) -> Self {
        let total = permissions.len();
        let get = permissions.iter().filter(|p| p.method == HttpMethod::Get).count();
        let post = permissions.iter().filter(|p| p.method == HttpMethod::Post).count();
        let other = total - get - post;
        Self {
            total,
            get,
            post,
            other,
            get_pct: percent(get, total),
            post_pct: percent(post, total),
            other_pct: percent(other, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
    pub active_pct: String,
    pub admin_pct: String,
}

impl UserStats {
    pub fn compute(users: &[User]) -> Self {
        let total = users.len();
        let active = users.iter().filter(|u| u.is_active()).count();
        let admins = users.iter().filter(|u| u.is_admin()).count();
        Self {
            total,
            active,
            inactive: total - active,
            admins,
            active_pct: percent(active, total),
            admin_pct: percent(admins, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionStats {
    pub total_roles: usize,
    pub total_permissions: usize,
    pub granted: usize,
    pub coverage_pct: String,
}

impl RolePermissionStats {
    /// `grants` are the associations of the currently selected role.
    pub fn compute(role_count: usize, permission_count: usize, grants: &[RolePermission]) -> Self {
        Self {
            total_roles: role_count,
            total_permissions: permission_count,
            granted: grants.len(),
            coverage_pct: percent(grants.len(), permission_count),
        }
    }
}

/// Badge text for a role's permission count; a failed per-role fetch reads "n/a".
pub fn count_badge(count: Option<usize>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: Option<&str>, active: Option<bool>) -> User {
        User {
            id: id.into(),
            name: id.into(),
            role: role.map(String::from),
            active,
            ..User::default()
        }
    }

    fn assignment(user_id: &str, role_id: &str) -> UserRole {
        UserRole { user_id: user_id.into(), role_id: role_id.into(), ..UserRole::default() }
    }

    fn permission(method: HttpMethod) -> Permission {
        Permission { method, ..Permission::default() }
    }

    #[test]
    fn percent_formats_one_decimal() {
        assert_eq!(percent(1, 3), "33.3");
        assert_eq!(percent(2, 2), "100.0");
        assert_eq!(percent(0, 0), "0.0");
    }

    #[test]
    fn role_stats_count_distinct_users() {
        let users = vec![user("u1", None, None), user("u2", None, None), user("u3", None, None)];
        let assignments = vec![assignment("u1", "r1"), assignment("u1", "r2"), assignment("u2", "r1")];
        let stats = RoleStats::compute(5, &users, &assignments);
        assert_eq!(stats.total_roles, 5);
        assert_eq!(stats.users_with_roles, 2);
        assert_eq!(stats.users_without_roles, 1);
        assert_eq!(stats.with_roles_pct, "66.7");
    }

    #[test]
    fn role_stats_ignore_dangling_assignments() {
        let users = vec![user("u1", None, None)];
        let stats = RoleStats::compute(1, &users, &[assignment("ghost", "r1")]);
        assert_eq!(stats.users_with_roles, 0);
        assert_eq!(stats.users_without_roles, 1);
    }

    #[test]
    fn permission_stats_split_by_method() {
        let perms = vec![
            permission(HttpMethod::Get),
            permission(HttpMethod::Get),
            permission(HttpMethod::Post),
            permission(HttpMethod::Delete),
        ];
        let stats = PermissionStats::compute(&perms);
        assert_eq!((stats.get, stats.post, stats.other), (2, 1, 1));
        assert_eq!(stats.get_pct, "50.0");
        assert_eq!(stats.other_pct, "25.0");
    }

    #[test]
    fn user_stats_defaults_missing_flags() {
        let users = vec![
            user("u1", Some("admin"), None),
            user("u2", Some("agent"), Some(false)),
            user("u3", None, Some(true)),
        ];
        let stats = UserStats::compute(&users);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.admins, 1);
    }

    #[test]
    fn empty_collections_give_zero_stats() {
        let stats = PermissionStats::compute(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.get_pct, "0.0");
    }

    #[test]
    fn badge_text() {
        assert_eq!(count_badge(Some(0)), "0");
        assert_eq!(count_badge(None), "n/a");
    }
}
