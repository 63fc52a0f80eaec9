pub mod api;
pub mod assignment;
pub mod auth;
pub mod chatbot;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod selection;
pub mod store;
pub mod templates_structs;
pub mod views;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{HttpResponse, cookie::Key, middleware::from_fn, web};

use crate::handlers::{
    auth_handlers, dashboard, message_handlers, permission_handlers, role_handlers,
    role_permission_handlers, user_handlers, user_role_handlers,
};

/// Encrypted cookie session holding the bearer token, the signed-in user and flash notices.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build()
}

/// Register every page route. Shared by the binary and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/dashboard"))
                .finish()
        }))
        .service(
            web::scope("/auth")
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit))
                .route("/verify-2fa", web::get().to(auth_handlers::verify_page))
                .route("/verify-2fa", web::post().to(auth_handlers::verify_submit))
                .route("/federated", web::post().to(auth_handlers::federated_submit))
                .route("/register", web::get().to(auth_handlers::register_page))
                .route("/register", web::post().to(auth_handlers::register_submit))
                .route("/logout", web::post().to(auth_handlers::logout)),
        )
        // Protected routes
        .service(
            web::scope("/dashboard")
                .wrap(from_fn(auth::middleware::logout_on_unauthorized))
                .wrap(from_fn(auth::middleware::require_auth))
                .route("", web::get().to(dashboard::index))
                // Users: /users/new BEFORE /users/{id}
                .route("/users", web::get().to(user_handlers::list))
                .route("/users/new", web::get().to(user_handlers::new_form))
                .route("/users", web::post().to(user_handlers::create))
                .route("/users/{id}/edit", web::get().to(user_handlers::edit_form))
                .route("/users/{id}", web::post().to(user_handlers::update))
                .route("/users/{id}/delete", web::get().to(user_handlers::delete_confirm))
                .route("/users/{id}/delete", web::post().to(user_handlers::delete))
                // Roles
                .route("/roles", web::get().to(role_handlers::list))
                .route("/roles/new", web::get().to(role_handlers::new_form))
                .route("/roles", web::post().to(role_handlers::create))
                .route("/roles/{id}/edit", web::get().to(role_handlers::edit_form))
                .route("/roles/{id}", web::post().to(role_handlers::update))
                .route("/roles/{id}/delete", web::get().to(role_handlers::delete_confirm))
                .route("/roles/{id}/delete", web::post().to(role_handlers::delete))
                // Permissions
                .route("/permissions", web::get().to(permission_handlers::list))
                .route("/permissions/new", web::get().to(permission_handlers::new_form))
                .route("/permissions", web::post().to(permission_handlers::create))
                .route("/permissions/{id}/edit", web::get().to(permission_handlers::edit_form))
                .route("/permissions/{id}", web::post().to(permission_handlers::update))
                .route("/permissions/{id}/delete", web::get().to(permission_handlers::delete_confirm))
                .route("/permissions/{id}/delete", web::post().to(permission_handlers::delete))
                // Role-permission associations
                .route("/role-permissions", web::get().to(role_permission_handlers::list))
                .route("/role-permissions", web::post().to(role_permission_handlers::grant))
                .route("/role-permissions/{id}/revoke", web::get().to(role_permission_handlers::revoke_confirm))
                .route("/role-permissions/{id}/revoke", web::post().to(role_permission_handlers::revoke))
                // User-role assignments
                .route("/user-roles", web::get().to(user_role_handlers::list))
                .route("/user-roles", web::post().to(user_role_handlers::assign))
                .route("/user-roles/{id}/revoke", web::post().to(user_role_handlers::revoke))
                // Messages
                .route("/messages", web::get().to(message_handlers::page))
                .route("/messages", web::post().to(message_handlers::send))
                .route("/messages/reset", web::post().to(message_handlers::reset)),
        );
}

/// Fallback for unknown paths.
pub async fn not_found() -> HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
