pub mod auth_handlers;
pub mod dashboard;
pub mod message_handlers;
pub mod permission_handlers;
pub mod role_handlers;
pub mod role_permission_handlers;
pub mod user_handlers;
pub mod user_role_handlers;

use actix_web::HttpResponse;

/// Post/redirect/get: every successful form submission ends here.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Report a failed backend call as an error notice and go back to `location`.
/// A rejected session is passed through so it can sign the user out.
pub(crate) fn notify_failure(
    session: &actix_session::Session,
    title: &str,
    err: crate::api::ApiError,
    location: &str,
) -> Result<HttpResponse, crate::errors::AppError> {
    if err.is_unauthorized() {
        return Err(crate::errors::AppError::Unauthorized);
    }
    log::warn!("{title}: {err}");
    crate::auth::session::set_notice(session, crate::views::Notice::error(title, err.to_string()));
    Ok(see_other(location))
}

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
