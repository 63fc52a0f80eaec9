use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::{ApiClient, permissions};
use crate::auth::{csrf, validate};
use crate::auth::session::{api_for, set_notice};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::{HttpMethod, Permission};
use crate::models::permission::{PermissionForm, PermissionPayload};
use crate::selection::{DialogQuery, SelectionDialog, SelectionPanel, Searchable, filter, url_path};
use crate::templates_structs::{
    PageContext, PermissionDeleteTemplate, PermissionFormTemplate, PermissionListTemplate, PermissionRow,
};
use crate::views::{ListView, Notice};
use crate::views::stats::PermissionStats;
use super::{notify_failure, see_other};

const LIST: &str = "/dashboard/permissions";

#[derive(Deserialize)]
pub struct PermissionListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(flatten)]
    pub dialog: DialogQuery,
}

pub async fn list(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<PermissionListQuery>,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let mut view = ListView::new();
    view.load(permissions::list(&api)).await?;

    let rows = filter(view.items(), &query.q).into_iter().map(PermissionRow::from).collect();

    let selection = ["edit", "delete"]
        .into_iter()
        .find(|name| query.dialog.is_open(name))
        .map(|name| {
            let dialog = SelectionDialog::restore(view.state().clone(), &query.dialog);
            let title = if name == "edit" { "Select a permission to edit" } else { "Select a permission to delete" };
            SelectionPanel::build(&dialog, title, LIST, name, &[("q", query.q.as_str())], |p: &Permission| {
                url_path(LIST, &[p.key(), name])
            })
        });

    let tmpl = PermissionListTemplate {
        ctx: PageContext::build(&session, LIST),
        rows,
        error: view.error().map(String::from),
        query: query.q.clone(),
        stats: PermissionStats::compute(view.items()),
        selection,
    };
    render(tmpl)
}

fn form_template(
    session: &Session,
    form_action: String,
    form_title: &str,
    url: &str,
    method: &str,
    errors: Vec<String>,
) -> PermissionFormTemplate {
    PermissionFormTemplate {
        ctx: PageContext::build(session, LIST),
        form_action,
        form_title: form_title.to_string(),
        url: url.to_string(),
        method: method.to_string(),
        methods: HttpMethod::ALL,
        errors,
    }
}

/// Required-field and method checks; returns the parsed method when valid.
fn check(form: &PermissionForm) -> Result<HttpMethod, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.url, "URL"));
    errors.extend(validate::validate_required(&form.method, "Method"));
    if !errors.is_empty() {
        return Err(errors);
    }
    form.method.parse::<HttpMethod>().map_err(|e| vec![e])
}

pub async fn new_form(session: Session) -> Result<HttpResponse, AppError> {
    render(form_template(&session, LIST.to_string(), "Create Permission", "", "GET", vec![]))
}

pub async fn create(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<PermissionForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let method = match check(&form) {
        Ok(m) => m,
        Err(errors) => {
            return render(form_template(&session, LIST.to_string(), "Create Permission", &form.url, &form.method, errors));
        }
    };

    let api = api_for(&api, &session);
    let payload = PermissionPayload { url: form.url.trim(), method };
    match permissions::create(&api, &payload).await {
        Ok(_) => {
            log::info!("Created permission {method} {}", payload.url);
            set_notice(&session, Notice::success("Permission created", format!("{method} {}", payload.url)));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not create permission: {e}");
            let errors = vec![e.to_string()];
            render(form_template(&session, LIST.to_string(), "Create Permission", &form.url, &form.method, errors))
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

    match permissions::get(&api, &id).await {
        Ok(p) => render(form_template(
            &session,
            url_path(LIST, &[id.as_str()]),
            "Edit Permission",
            &p.url,
            p.method.as_str(),
            vec![],
        )),
        Err(e) => notify_failure(&session, "Could not load permission", e, LIST),
    }
}

pub async fn update(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<PermissionForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let action = url_path(LIST, &[id.as_str()]);

    let method = match check(&form) {
        Ok(m) => m,
        Err(errors) => {
            return render(form_template(&session, action, "Edit Permission", &form.url, &form.method, errors));
        }
    };

    let api = api_for(&api, &session);
    let payload = PermissionPayload { url: form.url.trim(), method };
    match permissions::update(&api, &id, &payload).await {
        Ok(_) => {
            log::info!("Updated permission {id}");
            set_notice(&session, Notice::success("Permission updated", format!("{method} {}", payload.url)));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not update permission {id}: {e}");
            render(form_template(&session, action, "Edit Permission", &form.url, &form.method, vec![e.to_string()]))
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

    match permissions::get(&api, &id).await {
        Ok(p) => render(PermissionDeleteTemplate {
            ctx: PageContext::build(&session, LIST),
            permission: PermissionRow::from(&p),
        }),
        Err(e) => notify_failure(&session, "Could not load permission", e, LIST),
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

    match permissions::delete(&api, &id).await {
        Ok(()) => {
            log::info!("Deleted permission {id}");
            set_notice(&session, Notice::success("Permission deleted", "The permission was removed."));
            Ok(see_other(LIST))
        }
        Err(e) => notify_failure(&session, "Could not delete permission", e, LIST),
    }
}
