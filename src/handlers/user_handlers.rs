use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::api::{ApiClient, users};
use crate::auth::{csrf, validate};
use crate::auth::session::{api_for, set_notice};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::models::user::UserForm;
use crate::selection::{matches, url_path};
use crate::templates_structs::{PageContext, UserDeleteTemplate, UserFormTemplate, UserListTemplate, UserRow};
use crate::views::{ListView, Notice};
use crate::views::stats::UserStats;
use super::{SearchQuery, notify_failure, see_other};

const LIST: &str = "/dashboard/users";

pub async fn list(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let api = api_for(&api, &session);
    let mut view = ListView::new();
    view.load(users::list(&api)).await?;

    let ctx = PageContext::build(&session, LIST);
    let rows = view
        .items()
        .iter()
        .filter(|u| matches(&query.q, &[u.name.as_str(), u.email.as_str()]))
        .map(UserRow::from)
        .collect();

    let tmpl = UserListTemplate {
        ctx,
        rows,
        error: view.error().map(String::from),
        query: query.q.clone(),
        stats: UserStats::compute(view.items()),
    };
    render(tmpl)
}

fn form_template(
    session: &Session,
    form_action: String,
    form_title: &str,
    form: Option<&UserForm>,
    errors: Vec<String>,
) -> UserFormTemplate {
    UserFormTemplate {
        ctx: PageContext::build(session, LIST),
        is_edit: form_action != LIST,
        form_action,
        form_title: form_title.to_string(),
        name: form.map(|f| f.name.clone()).unwrap_or_default(),
        email: form.map(|f| f.email.clone()).unwrap_or_default(),
        errors,
    }
}

pub async fn new_form(session: Session) -> Result<HttpResponse, AppError> {
    render(form_template(&session, LIST.to_string(), "Create User", None, vec![]))
}

pub async fn create(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.name, "Name"));
    errors.extend(validate::validate_required(&form.email, "Email"));
    errors.extend(validate::validate_required(&form.password, "Password"));

    if !errors.is_empty() {
        return render(form_template(&session, LIST.to_string(), "Create User", Some(&*form), errors));
    }

    let api = api_for(&api, &session);
    match users::create(&api, &form.payload()).await {
        Ok(_) => {
            log::info!("Created user {}", form.email.trim());
            set_notice(&session, Notice::success("User created", format!("{} was added.", form.name.trim())));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not create user: {e}");
            render(form_template(&session, LIST.to_string(), "Create User", Some(&*form), vec![e.to_string()]))
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

    match users::get(&api, &id).await {
        Ok(u) => {
            let mut tmpl = form_template(&session, url_path(LIST, &[id.as_str()]), "Edit User", None, vec![]);
            tmpl.name = u.name;
            tmpl.email = u.email;
            render(tmpl)
        }
        Err(e) => notify_failure(&session, "Could not load user", e, LIST),
    }
}

pub async fn update(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();
    let action = url_path(LIST, &[id.as_str()]);

    // Password is optional on update; a blank one keeps the stored password.
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.name, "Name"));
    errors.extend(validate::validate_required(&form.email, "Email"));

    if !errors.is_empty() {
        return render(form_template(&session, action, "Edit User", Some(&*form), errors));
    }

    let api = api_for(&api, &session);
    match users::update(&api, &id, &form.payload()).await {
        Ok(_) => {
            log::info!("Updated user {id}");
            set_notice(&session, Notice::success("User updated", format!("{} was saved.", form.name.trim())));
            Ok(see_other(LIST))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("Could not update user {id}: {e}");
            render(form_template(&session, action, "Edit User", Some(&*form), vec![e.to_string()]))
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

    match users::get(&api, &id).await {
        Ok(user) => render(UserDeleteTemplate { ctx: PageContext::build(&session, LIST), user }),
        Err(e) => notify_failure(&session, "Could not load user", e, LIST),
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

    match users::delete(&api, &id).await {
        Ok(()) => {
            log::info!("Deleted user {id}");
            set_notice(&session, Notice::success("User deleted", "The user was removed."));
            Ok(see_other(LIST))
        }
        Err(e) => notify_failure(&session, "Could not delete user", e, LIST),
    }
}
