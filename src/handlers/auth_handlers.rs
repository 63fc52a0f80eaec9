use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::api::{self, ApiClient, users};
use crate::auth::{csrf, validate};
use crate::auth::session::{self, is_signed_in, set_notice, sign_in, take_notice};
use crate::errors::{AppError, render};
use crate::models::SessionUser;
use crate::models::user::RegisterForm;
use crate::selection::link;
use crate::templates_structs::{LoginTemplate, RegisterTemplate, Verify2faTemplate};
use crate::views::Notice;
use super::see_other;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub email: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub code: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct FederatedForm {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub id_token: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_template(session: &Session, error: Option<String>, email: &str) -> LoginTemplate {
    LoginTemplate {
        error,
        notice: take_notice(session),
        email: email.to_string(),
        csrf_token: csrf::get_or_create_token(session),
        providers: api::auth::PROVIDERS.to_vec(),
    }
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if is_signed_in(&session) {
        return Ok(see_other("/dashboard"));
    }
    render(login_template(&session, None, ""))
}

pub async fn login_submit(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        let error = "Email and password are required".to_string();
        return render(login_template(&session, Some(error), email));
    }

    match api::auth::login(&api, email, &form.password).await {
        Ok(resp) => {
            // Accounts without a second factor get the token straight away.
            if let (Some(token), Some(user)) = (resp.token.as_deref(), resp.user.as_ref()) {
                sign_in(&session, token, user)?;
                log::info!("User {email} signed in");
                return Ok(see_other("/dashboard"));
            }
            match resp.session_id.filter(|s| !s.is_empty()) {
                Some(session_id) => {
                    log::info!("2FA code requested for {email}");
                    Ok(see_other(&link(
                        "/auth/verify-2fa",
                        &[("email", email), ("sessionId", session_id.as_str())],
                    )))
                }
                None => {
                    let error = "No response from server".to_string();
                    render(login_template(&session, Some(error), email))
                }
            }
        }
        Err(e) => {
            log::warn!("Login failed for {email}: {e}");
            render(login_template(&session, Some(e.to_string()), email))
        }
    }
}

pub async fn verify_page(
    session: Session,
    query: web::Query<VerifyQuery>,
) -> Result<HttpResponse, AppError> {
    let VerifyQuery { email, session_id } = query.into_inner();
    let (Some(email), Some(session_id)) = (email, session_id) else {
        return Ok(see_other("/auth/login"));
    };
    render(Verify2faTemplate {
        error: None,
        email,
        session_id,
        csrf_token: csrf::get_or_create_token(&session),
    })
}

pub async fn verify_submit(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<VerifyForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let email = form.email.trim();
    if email.is_empty() || form.session_id.is_empty() {
        return Ok(see_other("/auth/login"));
    }

    let retry = |error: String| Verify2faTemplate {
        error: Some(error),
        email: email.to_string(),
        session_id: form.session_id.clone(),
        csrf_token: csrf::get_or_create_token(&session),
    };

    if let Some(error) = validate::validate_required(&form.code, "Code") {
        return render(retry(error));
    }

    match api::auth::validate_2fa(&api, email, form.code.trim(), &form.session_id).await {
        Ok(resp) => {
            let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
                return render(retry("No response from server".to_string()));
            };
            let user = resp.user.unwrap_or_else(|| SessionUser {
                email: email.to_string(),
                ..SessionUser::default()
            });
            sign_in(&session, &token, &user)?;
            set_notice(&session, Notice::success("Welcome", format!("Signed in as {}", user.display_name())));
            log::info!("User {email} completed 2FA");
            Ok(see_other("/dashboard"))
        }
        Err(e) => {
            log::warn!("2FA failed for {email}: {e}");
            render(retry(e.to_string()))
        }
    }
}

pub async fn federated_submit(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<FederatedForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let provider = form.provider.trim().to_lowercase();
    if !api::auth::is_supported_provider(&provider) {
        return render(login_template(&session, Some("Unsupported provider".to_string()), ""));
    }
    if let Some(error) = validate::validate_required(&form.id_token, "Identity token") {
        return render(login_template(&session, Some(error), ""));
    }

    let user = match api::auth::federated_login(&api, &form.id_token).await {
        Ok(resp) => resp.into_session_user(),
        Err(e) => {
            log::warn!("Federated exchange with backend failed ({provider}): {e}");
            return render(login_template(&session, Some(e.to_string()), ""));
        }
    };

    sign_in(&session, &form.id_token, &user)?;
    log::info!("User signed in via {provider}");
    Ok(see_other("/dashboard"))
}

fn register_template(session: &Session, errors: Vec<String>, form: Option<&RegisterForm>) -> RegisterTemplate {
    RegisterTemplate {
        errors,
        name: form.map(|f| f.name.clone()).unwrap_or_default(),
        email: form.map(|f| f.email.clone()).unwrap_or_default(),
        csrf_token: csrf::get_or_create_token(session),
    }
}

pub async fn register_page(session: Session) -> Result<HttpResponse, AppError> {
    if is_signed_in(&session) {
        return Ok(see_other("/dashboard"));
    }
    render(register_template(&session, vec![], None))
}

pub async fn register_submit(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.name, "Name"));
    errors.extend(validate::validate_required(&form.email, "Email"));
    errors.extend(validate::validate_required(&form.password, "Password"));
    errors.extend(validate::validate_passwords_match(&form.password, &form.confirm_password));

    if !errors.is_empty() {
        return render(register_template(&session, errors, Some(&*form)));
    }

    match users::create(&api, &form.payload()).await {
        Ok(_) => {
            log::info!("Registered account {}", form.email.trim());
            set_notice(&session, Notice::success("Account created", "You can now sign in."));
            Ok(see_other("/auth/login"))
        }
        Err(e) => render(register_template(&session, vec![e.to_string()], Some(&*form))),
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session::sign_out(&session);
    Ok(see_other("/auth/login"))
}
