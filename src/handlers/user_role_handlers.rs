use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};
use crate::assignment::{self, AssignmentRow, assign_role, cross_reference, filter_rows, revoke_user_role};
use crate::auth::csrf;
use crate::auth::session::{api_for, set_notice};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::user_role::AssignForm;
use crate::models::{Role, User};
use crate::selection::{DialogQuery, SelectionDialog, SelectionPanel, link};
use crate::store::Directory;
use crate::templates_structs::{LookupRow, PageContext, UserRolesTemplate};
use super::see_other;

const LIST: &str = "/dashboard/user-roles";

#[derive(Deserialize)]
pub struct UserRoleQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub role_id: String,
    /// Name lookup.
    #[serde(default)]
    pub lookup: String,
    /// Role whose holders are listed.
    #[serde(default)]
    pub role: String,
    #[serde(flatten)]
    pub dialog: DialogQuery,
}

/// Split a lookup result into rows and a load error. Only a 401 escapes.
fn settle<T>(result: Result<Vec<T>, ApiError>) -> Result<(Vec<T>, Option<String>), AppError> {
    match result {
        Ok(rows) => Ok((rows, None)),
        Err(ApiError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            log::warn!("Lookup failed: {e}");
            Ok((vec![], Some(e.to_string())))
        }
    }
}

pub async fn list(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<UserRoleQuery>,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let directory = Directory::load(&api).await?;

    let all = cross_reference(directory.user_roles(), directory.users(), directory.roles());
    let rows: Vec<AssignmentRow> = filter_rows(&all, &query.q).into_iter().cloned().collect();

    let user_label = directory.user(&query.user_id).map(|u| format!("{} ({})", u.name, u.email));
    let role_label = directory.role(&query.role_id).map(|r| r.name.clone());
    let user_current_roles = all
        .iter()
        .filter(|r| !query.user_id.is_empty() && r.user_id == query.user_id)
        .map(|r| r.role_name.clone())
        .collect();

    let keep = [
        ("q", query.q.as_str()),
        ("user_id", query.user_id.as_str()),
        ("role_id", query.role_id.as_str()),
    ];
    let selection = if query.dialog.is_open("user") {
        let dialog = SelectionDialog::restore(directory.users_state().clone(), &query.dialog);
        Some(SelectionPanel::build(&dialog, "Select a user", LIST, "user", &keep, |u: &User| {
            link(LIST, &[("q", query.q.as_str()), ("user_id", u.id.as_str()), ("role_id", query.role_id.as_str())])
        }))
    } else if query.dialog.is_open("role") {
        let dialog = SelectionDialog::restore(directory.roles_state().clone(), &query.dialog);
        Some(SelectionPanel::build(&dialog, "Select a role", LIST, "role", &keep, |r: &Role| {
            link(LIST, &[("q", query.q.as_str()), ("user_id", query.user_id.as_str()), ("role_id", r.id.as_str())])
        }))
    } else {
        None
    };

    let (lookup_rows, lookup_error) = if query.lookup.trim().is_empty() {
        (vec![], None)
    } else {
        let found = assignment::search_users_with_roles(&api, &query.lookup, directory.users(), directory.roles()).await;
        let (found, error) = settle(found)?;
        let rows = found
            .into_iter()
            .map(|f| LookupRow { name: f.user.name, email: f.user.email, roles: f.roles })
            .collect();
        (rows, error)
    };

    let (holders_role, holders, holders_error) = if query.role.is_empty() {
        (None, vec![], None)
    } else {
        let found = assignment::users_by_role(&api, &query.role, directory.users(), directory.roles()).await;
        let (holders, error) = settle(found)?;
        let name = directory.role(&query.role).map(|r| r.name.clone()).unwrap_or_else(|| "Role not found".to_string());
        (Some(name), holders, error)
    };

    let with_dialog = |name: &str| {
        let mut params = keep.to_vec();
        params.push(("dialog", name));
        link(LIST, &params)
    };

    let tmpl = UserRolesTemplate {
        ctx: PageContext::build(&session, LIST),
        rows,
        error: directory.user_roles_state().error().map(String::from),
        query: query.q.clone(),
        user_id: if user_label.is_some() { query.user_id.clone() } else { String::new() },
        user_label,
        user_current_roles,
        role_id: if role_label.is_some() { query.role_id.clone() } else { String::new() },
        role_label,
        choose_user_href: with_dialog("user"),
        choose_role_href: with_dialog("role"),
        selection,
        lookup: query.lookup.clone(),
        lookup_rows,
        lookup_error,
        holders_role,
        holders,
        holders_error,
        role_options: directory.roles().iter().map(|r| (r.id.clone(), r.name.clone())).collect(),
    };
    render(tmpl)
}

pub async fn assign(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<AssignForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = api_for(&api, &session);
    let user_id = form.user_id.trim();
    let role_id = form.role_id.trim();

    let outcome = assign_role(&api, user_id, role_id).await?;
    let location = if outcome.succeeded() {
        link(LIST, &[("user_id", user_id)])
    } else {
        link(LIST, &[("user_id", user_id), ("role_id", role_id)])
    };
    set_notice(&session, outcome.notice);
    Ok(see_other(&location))
}

pub async fn revoke(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let api = api_for(&api, &session);

    let outcome = revoke_user_role(&api, &id).await?;
    set_notice(&session, outcome.notice);
    Ok(see_other(LIST))
}
