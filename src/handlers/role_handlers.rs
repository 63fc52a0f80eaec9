use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::{ApiClient, roles};
use crate::assignment::permission_counts;
use crate::auth::{csrf, validate};
use crate::auth::session::{api_for, set_notice};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::Role;
use crate::models::role::RoleForm;
use crate::selection::{DialogQuery, SelectionDialog, SelectionPanel, matches, url_path};
use crate::store::Directory;
use crate::templates_structs::{PageContext, RoleDeleteTemplate, RoleFormTemplate, RoleListTemplate, RoleRow};
use crate::views::Notice;
use crate::views::stats::{RoleStats, count_badge};
use super::{notify_failure, see_other};

const LIST: &str = "/dashboard/roles";

#[derive(Deserialize)]
pub struct RoleListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(flatten)]
    pub dialog: DialogQuery,
}

pub async fn list(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<RoleListQuery>,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let directory = Directory::load(&api).await?;
    let counts = permission_counts(&api, directory.roles()).await?;

    let rows = directory
        .roles()
        .iter()
        .filter(|r| matches(&query.q, &[r.name.as_str(), r.description.as_str()]))
        .map(|r| RoleRow {
            id: r.id.clone(),
            name: r.name.clone(),
            description: r.description.clone(),
            permissions: count_badge(counts.get(&r.id).copied().flatten()),
        })
        .collect();

    let selection = ["edit", "delete"]
        .into_iter()
        .find(|name| query.dialog.is_open(name))
        .map(|name| {
            let dialog = SelectionDialog::restore(directory.roles_state().clone(), &query.dialog);
            let title = if name == "edit" { "Select a role to edit" } else { "Select a role to delete" };
            SelectionPanel::build(&dialog, title, LIST, name, &[("q", query.q.as_str())], |r: &Role| {
                url_path(LIST, &[r.id.as_str(), name])
            })
        });

    let tmpl = RoleListTemplate {
        ctx: PageContext::build(&session, LIST),
        rows,
        error: directory.roles_state().error().map(String::from),
        query: query.q.clone(),
        stats: RoleStats::compute(directory.roles().len(), directory.users(), directory.user_roles()),
        selection,
    };
    render(tmpl)
}

fn form_template(
    session: &Session,
    form_action: String,
    form_title: &str,
    name: &str,
    description: &str,
    errors: Vec<String>,
) -> RoleFormTemplate {
    RoleFormTemplate {
        ctx: PageContext::build(session, LIST),
        form_action,
        form_title: form_title.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        errors,
    }
}

pub async fn new_form(session: Session) -> Result<HttpResponse, AppError> {
    render(form_template(&session, LIST.to_string(), "Create Role", "", "", vec![]))
}

pub async fn create(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors: Vec<String> = validate::validate_required(&form.name, "Name").into_iter().collect();
    if !errors.is_empty() {
        return render(form_template(&session, LIST.to_string(), "Create Role", &form.name, &form.description, errors));
    }

    let api = api_for(&api, &session);
    match roles::create(&api, &form.payload()).await {
        Ok(_) => {
            log::info!("Created role {}", form.name.trim());
            set_notice(&session, Notice::success("Role created", format!("{} was added.", form.name.trim())));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not create role: {e}");
            let errors = vec![e.to_string()];
            render(form_template(&session, LIST.to_string(), "Create Role", &form.name, &form.description, errors))
        }
    }
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let api = api_for(&api, &session);

    match roles::get(&api, &id).await {
        Ok(r) => render(form_template(&session, url_path(LIST, &[id.as_str()]), "Edit Role", &r.name, &r.description, vec![])),
        Err(e) => notify_failure(&session, "Could not load role", e, LIST),
    }
}

pub async fn update(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let action = url_path(LIST, &[id.as_str()]);

    let errors: Vec<String> = validate::validate_required(&form.name, "Name").into_iter().collect();
    if !errors.is_empty() {
        return render(form_template(&session, action, "Edit Role", &form.name, &form.description, errors));
    }

    let api = api_for(&api, &session);
    match roles::update(&api, &id, &form.payload()).await {
        Ok(_) => {
            log::info!("Updated role {id}");
            set_notice(&session, Notice::success("Role updated", format!("{} was saved.", form.name.trim())));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not update role {id}: {e}");
            render(form_template(&session, action, "Edit Role", &form.name, &form.description, vec![e.to_string()]))
        }
    }
}

pub async fn delete_confirm(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let api = api_for(&api, &session);

    match roles::get(&api, &id).await {
        Ok(role) => render(RoleDeleteTemplate { ctx: PageContext::build(&session, LIST), role }),
        Err(e) => notify_failure(&session, "Could not load role", e, LIST),
    }
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let api = api_for(&api, &session);

    match roles::delete(&api, &id).await {
        Ok(()) => {
            log::info!("Deleted role {id}");
            set_notice(&session, Notice::success("Role deleted", "The role was removed."));
            Ok(see_other(LIST))
        }
        Err(e) => notify_failure(&session, "Could not delete role", e, LIST),
    }
}
