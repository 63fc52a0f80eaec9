//! Entity access layer tests against the in-memory backend.
//!
//! Covers request paths, bearer propagation, error message mapping and the
//! 401 handling that distinguishes expired sessions from bad credentials.

mod common;

use common::*;
use travel_admin::api::{self, ApiError, permissions, role_permissions, roles, user_roles, users};
use travel_admin::models::HttpMethod;
use travel_admin::models::permission::PermissionPayload;
use travel_admin::models::role::RolePayload;
use travel_admin::models::user::UserPayload;

#[actix_web::test]
async fn test_list_roles_sends_bearer_token() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let list = roles::list(&api).await.expect("roles");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "r1");
    assert_eq!(list[0].name, "Administrador");

    let requests = backend.requests();
    assert_eq!(requests[0].line(), "GET /api/roles");
    assert_eq!(requests[0].bearer.as_deref(), Some("tok-1"));
}

#[actix_web::test]
async fn test_requests_without_token_carry_no_header() {
    let backend = FakeBackend::seeded().await;
    users::list(&backend.api()).await.expect("users");
    assert_eq!(backend.requests()[0].bearer, None);
}

#[actix_web::test]
async fn test_user_crud_round() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let created = users::create(
        &api,
        &UserPayload { name: "Lucía Gómez", email: "lucia@viajes.co", password: Some("pw") },
    )
    .await
    .expect("create");
    assert!(!created.id.is_empty());

    let updated = users::update(&api, &created.id, &UserPayload { name: "Lucía G.", email: "lucia@viajes.co", password: None })
        .await
        .expect("update");
    assert_eq!(updated.name, "Lucía G.");

    users::delete(&api, &created.id).await.expect("delete");
    assert_eq!(users::list(&api).await.expect("list").len(), 2);

    let lines = backend.request_lines();
    assert_eq!(lines[0], "POST /api/users");
    assert_eq!(lines[1], format!("PUT /api/users/{}", created.id));
    assert_eq!(lines[2], format!("DELETE /api/users/{}", created.id));
}

#[actix_web::test]
async fn test_backend_message_is_surfaced() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let err = users::create(&api, &UserPayload { name: "Ana", email: ADMIN_EMAIL, password: Some("pw") })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert_eq!(err.status(), Some(409));
}

#[actix_web::test]
async fn test_generic_message_when_backend_is_silent() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let err = roles::update(&api, "missing", &RolePayload { name: "x", description: "" })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not found");

    // Nothing listens on port 9; the connection failure gets the generic text.
    let settings = travel_admin::config::Settings {
        api_url: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };
    let offline = api::ApiClient::new(&settings).unwrap();
    let err = permissions::list(&offline).await.unwrap_err();
    assert_eq!(err.to_string(), "Could not load permissions");
}

#[actix_web::test]
async fn test_expired_token_yields_unauthorized() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("expired".to_string()));

    let err = users::list(&api).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(err.is_unauthorized());
}

#[actix_web::test]
async fn test_bad_credentials_are_not_a_session_expiry() {
    let backend = FakeBackend::seeded().await;
    let err = api::auth::login(&backend.api(), ADMIN_EMAIL, "wrong").await.unwrap_err();
    assert!(!err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[actix_web::test]
async fn test_two_step_login() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api();

    let step_one = api::auth::login(&api, ADMIN_EMAIL, PASSWORD).await.expect("login");
    assert_eq!(step_one.session_id.as_deref(), Some(SESSION_ID));
    assert!(step_one.token.is_none());

    let err = api::auth::validate_2fa(&api, ADMIN_EMAIL, "000000", SESSION_ID).await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect or expired code");

    let step_two = api::auth::validate_2fa(&api, ADMIN_EMAIL, VALID_CODE, SESSION_ID).await.expect("2fa");
    assert_eq!(step_two.token.as_deref(), Some("tok-1"));
    assert_eq!(step_two.user.map(|u| u.id), Some("u2".to_string()));
}

#[actix_web::test]
async fn test_permission_method_round_trips_through_backend() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let created = permissions::create(&api, &PermissionPayload { url: "/api/bookings", method: HttpMethod::Post })
        .await
        .expect("create");
    assert_eq!(created.method, HttpMethod::Post);

    let stored = backend.with_store(|s| s.permissions.last().cloned()).unwrap();
    assert_eq!(stored["method"], "POST");
}

#[actix_web::test]
async fn test_join_endpoints() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let created = user_roles::assign(&api, "u1", "r1").await.expect("assign");
    assert_eq!(created.map(|ur| ur.user_id), Some("u1".to_string()));

    let by_user = user_roles::by_user(&api, "u1").await.expect("by user");
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].role_id, "r1");

    let by_role = user_roles::by_role(&api, "r1").await.expect("by role");
    assert_eq!(by_role.len(), 2);

    // The grant endpoint answers with an empty body.
    let echoed = role_permissions::create(&api, "r1", "p1").await.expect("grant");
    assert!(echoed.is_none());
    let grants = role_permissions::by_role(&api, "r1").await.expect("grants");
    assert_eq!(grants.len(), 2);
    assert_eq!(grants[0].permission_url(), "/api/users");

    let lines = backend.request_lines();
    assert_eq!(lines[0], "POST /api/user-role/user/u1/role/r1");
    assert_eq!(lines[1], "GET /api/user-role/user/u1");
    assert_eq!(lines[2], "GET /api/user-role/role/r1");
    assert_eq!(lines[3], "POST /api/role-permission/role/r1/permission/p1");
    assert_eq!(lines[4], "GET /api/role-permission/role/r1");
}

#[actix_web::test]
async fn test_duplicate_assignment_reports_conflict() {
    let backend = FakeBackend::seeded().await;
    let api = backend.api().with_token(Some("tok-1".to_string()));

    let err = user_roles::assign(&api, "u2", "r1").await.unwrap_err();
    assert_eq!(err.to_string(), "User already has this role");
}
