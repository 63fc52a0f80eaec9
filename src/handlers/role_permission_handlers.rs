use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::{ApiClient, role_permissions};
use crate::assignment::{grant_permission, revoke_role_permission};
use crate::auth::csrf;
use crate::auth::session::{api_for, set_notice};
use crate::errors::{AppError, render};
use crate::models::{Permission, Role};
use crate::models::role_permission::{GrantForm, RevokeGrantForm};
use crate::selection::{DialogQuery, SelectionDialog, SelectionPanel, link, matches, url_path};
use crate::store::Directory;
use crate::templates_structs::{GrantRow, PageContext, RevokeGrantTemplate, RoleOption, RolePermissionsTemplate};
use crate::views::{ListView, Notice};
use crate::views::stats::RolePermissionStats;
use super::{notify_failure, see_other};

const LIST: &str = "/dashboard/role-permissions";

#[derive(Deserialize)]
pub struct RolePermissionQuery {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub permission_id: String,
    #[serde(flatten)]
    pub dialog: DialogQuery,
}

#[derive(Deserialize)]
pub struct RevokeQuery {
    #[serde(default)]
    pub role: String,
}

fn role_page(role_id: &str) -> String {
    link(LIST, &[("role", role_id)])
}

pub async fn list(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<RolePermissionQuery>,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let directory = Directory::load(&api).await?;

    // Default to the first role so the page always shows something.
    let role_id = if query.role.is_empty() {
        directory.roles().first().map(|r| r.id.clone()).unwrap_or_default()
    } else {
        query.role.clone()
    };

    let mut grants = ListView::new();
    if !role_id.is_empty() {
        grants.load(role_permissions::by_role(&api, &role_id)).await?;
    }

    let rows = grants
        .items()
        .iter()
        .filter(|g| matches(&query.q, &[g.permission_url(), g.method_label()]))
        .map(|g| GrantRow {
            id: g.id.clone(),
            url: g.permission_url().to_string(),
            method: g.method_label(),
            badge_class: g.permission.as_ref().map(|p| p.method.badge_class()).unwrap_or("badge-none"),
            revoke_href: link(&url_path(LIST, &[g.id.as_str(), "revoke"]), &[("role", role_id.as_str())]),
        })
        .collect();

    let keep = [("role", role_id.as_str()), ("q", query.q.as_str()), ("permission_id", query.permission_id.as_str())];
    let selection = if query.dialog.is_open("permission") {
        let dialog = SelectionDialog::restore(directory.permissions_state().clone(), &query.dialog);
        Some(SelectionPanel::build(&dialog, "Select a permission", LIST, "permission", &keep, |p: &Permission| {
            link(LIST, &[("role", role_id.as_str()), ("permission_id", p.id.as_str())])
        }))
    } else if query.dialog.is_open("role") {
        let dialog = SelectionDialog::restore(directory.roles_state().clone(), &query.dialog);
        Some(SelectionPanel::build(&dialog, "Select a role", LIST, "role", &keep, |r: &Role| role_page(&r.id)))
    } else {
        None
    };

    let role_name = directory.role(&role_id).map(|r| r.name.clone()).unwrap_or_default();
    let permission_label = directory
        .permission(&query.permission_id)
        .map(|p| format!("{} {}", p.method, p.url));

    let tmpl = RolePermissionsTemplate {
        ctx: PageContext::build(&session, LIST),
        roles: directory
            .roles()
            .iter()
            .map(|r| RoleOption { id: r.id.clone(), name: r.name.clone(), selected: r.id == role_id })
            .collect(),
        roles_error: directory.roles_state().error().map(String::from),
        role_name,
        rows,
        error: grants.error().map(String::from),
        query: query.q.clone(),
        stats: RolePermissionStats::compute(directory.roles().len(), directory.permissions().len(), grants.items()),
        permission_id: if permission_label.is_some() { query.permission_id.clone() } else { String::new() },
        permission_label,
        choose_permission_href: link(
            LIST,
            &[("role", role_id.as_str()), ("q", query.q.as_str()), ("dialog", "permission")],
        ),
        selection,
        role_id,
    };
    render(tmpl)
}

pub async fn grant(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<GrantForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = api_for(&api, &session);

    let outcome = grant_permission(&api, form.role_id.trim(), form.permission_id.trim()).await?;
    set_notice(&session, outcome.notice);
    Ok(see_other(&role_page(form.role_id.trim())))
}

pub async fn revoke_confirm(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<RevokeQuery>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let back = role_page(&query.role);
    let api = api_for(&api, &session);

    let grants = match role_permissions::by_role(&api, &query.role).await {
        Ok(grants) => grants,
        Err(e) => return notify_failure(&session, "Could not load role permissions", e, &back),
    };
    let Some(grant) = grants.into_iter().find(|g| g.id == id) else {
        set_notice(&session, Notice::error("Not found", "That permission is no longer granted to the role."));
        return Ok(see_other(&back));
    };

    let tmpl = RevokeGrantTemplate {
        ctx: PageContext::build(&session, LIST),
        id,
        role_id: query.role.clone(),
        role_name: grant.role_name().to_string(),
        url: grant.permission_url().to_string(),
        method: grant.method_label(),
    };
    render(tmpl)
}

pub async fn revoke(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<RevokeGrantForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let api = api_for(&api, &session);

    let outcome = revoke_role_permission(&api, &id, &form.role_id).await?;
    set_notice(&session, outcome.notice);
    Ok(see_other(&role_page(&form.role_id)))
}
