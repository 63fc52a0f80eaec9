use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::errors::AppError;

/// Middleware function that checks for a bearer token in the session.
/// Redirects to /auth/login if none is stored.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();

    if !super::session::is_signed_in(&session) {
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", "/auth/login"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Clears stored credentials whenever a handler reports that the backend
/// rejected the session token. The handler's error already renders the
/// redirect; this only purges the session so the cookie is dropped.
pub async fn logout_on_unauthorized(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let res = next.call(req).await?;

    let unauthorized = res
        .response()
        .error()
        .and_then(|e| e.as_error::<AppError>())
        .is_some_and(|e| matches!(e, AppError::Unauthorized));

    if unauthorized {
        log::info!("Backend rejected session token, signing out");
        super::session::sign_out(&res.request().get_session());
    }

    Ok(res)
}
