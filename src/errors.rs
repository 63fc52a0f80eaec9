use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use std::fmt;

use crate::api::ApiError;

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    /// Backend rejected the session token. Rendered as a redirect to the login
    /// screen; `auth::middleware::logout_on_unauthorized` purges the session.
    Unauthorized,
    Template(askama::Error),
    Session(String),
    Csrf,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "Backend error: {e}"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::SEE_OTHER,
            AppError::Csrf => StatusCode::FORBIDDEN,
            AppError::Api(e) if e.status() == Some(404) => StatusCode::NOT_FOUND,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => HttpResponse::SeeOther()
                .insert_header(("Location", "/auth/login"))
                .finish(),
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Api(e) if e.status() == Some(404) => HttpResponse::NotFound().body(e.to_string()),
            AppError::Api(e) => {
                log::warn!("{self}");
                HttpResponse::BadGateway().body(e.to_string())
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Unauthorized => AppError::Unauthorized,
            other => AppError::Api(other),
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
