//! Shared test infrastructure.
//!
//! - `FakeBackend` - an in-memory stand-in for the REST backend, served on a
//!   random local port so the real `ApiClient` talks HTTP to it.
//! - `Browser` - drives the admin app through `actix_web::test`, carrying the
//!   session cookie and CSRF token between requests.
#![allow(dead_code)]

use std::sync::Mutex;

use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer,
    body::MessageBody,
    cookie::{Cookie, Key},
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use regex::Regex;
use serde_json::{Value, json};

use travel_admin::api::ApiClient;
use travel_admin::config::Settings;
use travel_admin::{not_found, routes, session_middleware};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const PASSWORD: &str = "secret";
pub const VALID_CODE: &str = "123456";
pub const SESSION_ID: &str = "s-1";
/// Signing in with an email starting with this yields a token the backend rejects.
pub const EXPIRED_EMAIL: &str = "expired@viajes.co";
pub const ADMIN_EMAIL: &str = "ana@viajes.co";
/// The only identity token the federated exchange accepts.
pub const PROVIDER_TOKEN: &str = "google-ok";
const EXPIRED_TOKEN: &str = "expired";

// ============================================================================
// FAKE BACKEND
// ============================================================================

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
}

impl Recorded {
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<Value>,
    pub roles: Vec<Value>,
    pub permissions: Vec<Value>,
    pub user_roles: Vec<Value>,
    pub role_permissions: Vec<Value>,
    pub requests: Vec<Recorded>,
    next_id: usize,
}

impl Store {
    /// Two users, one role, one permission; Ana holds the role, the role holds the permission.
    pub fn seeded() -> Self {
        let admin = json!({"_id": "r1", "name": "Administrador", "description": "Acceso total"});
        let list_users = json!({"_id": "p1", "url": "/api/users", "method": "GET"});
        Store {
            users: vec![
                json!({"_id": "u1", "name": "Juan Pérez", "email": "juan@viajes.co", "role": "cliente", "active": true}),
                json!({"_id": "u2", "name": "Ana Admin", "email": ADMIN_EMAIL, "role": "Administrador", "active": true}),
            ],
            roles: vec![admin.clone()],
            permissions: vec![list_users.clone()],
            user_roles: vec![json!({"_id": "ur1", "userId": "u2", "roleId": "r1"})],
            role_permissions: vec![json!({"_id": "rp1", "role": admin, "permission": list_users})],
            ..Store::default()
        }
    }

    fn new_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn collection(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        match name {
            "users" => Some(&mut self.users),
            "roles" => Some(&mut self.roles),
            "permissions" => Some(&mut self.permissions),
            "user-role" => Some(&mut self.user_roles),
            "role-permission" => Some(&mut self.role_permissions),
            _ => None,
        }
    }
}

fn message(status: StatusCode, text: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "message": text }))
}

fn find<'a>(items: &'a [Value], id: &str) -> Option<&'a Value> {
    items.iter().find(|v| v["_id"] == id)
}

async fn handle(req: HttpRequest, body: web::Bytes, store: web::Data<Mutex<Store>>) -> HttpResponse {
    let method = req.method().as_str().to_string();
    let path = req.path().to_string();
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let mut store = store.lock().unwrap();
    store.requests.push(Recorded { method: method.clone(), path: path.clone(), bearer: bearer.clone() });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["api", "public", "security", "login"]) => {
            return if body["password"] == PASSWORD {
                HttpResponse::Ok().json(json!({"message": "Code sent", "sessionId": SESSION_ID}))
            } else {
                message(StatusCode::UNAUTHORIZED, "Invalid credentials")
            };
        }
        ("POST", ["api", "public", "security", "validate2fa"]) => {
            if body["code2FA"] != VALID_CODE || body["sessionId"] != SESSION_ID {
                return message(StatusCode::BAD_REQUEST, "Incorrect or expired code");
            }
            let email = body["email"].as_str().unwrap_or_default();
            let token = if email == EXPIRED_EMAIL { EXPIRED_TOKEN } else { "tok-1" };
            return HttpResponse::Ok().json(json!({
                "token": token,
                "user": {"_id": "u2", "name": "Ana Admin", "email": email},
            }));
        }
        ("POST", ["api", "auth", "firebase-login"]) => {
            return if bearer.as_deref() == Some(PROVIDER_TOKEN) {
                HttpResponse::Ok().json(json!({
                    "uid": "fb-1",
                    "email": ADMIN_EMAIL,
                    "name": "Ana Admin",
                    "provider": "google",
                    "systemUserId": "u2",
                }))
            } else {
                message(StatusCode::UNAUTHORIZED, "Invalid identity token")
            };
        }
        _ => {}
    }

    if bearer.as_deref() == Some(EXPIRED_TOKEN) {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    }

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "user-role", "user", id]) => {
            let found: Vec<&Value> = store.user_roles.iter().filter(|v| v["userId"] == *id).collect();
            HttpResponse::Ok().json(found)
        }
        ("GET", ["api", "user-role", "role", id]) => {
            let found: Vec<&Value> = store.user_roles.iter().filter(|v| v["roleId"] == *id).collect();
            HttpResponse::Ok().json(found)
        }
        ("GET", ["api", "role-permission", "role", id]) => {
            let found: Vec<&Value> = store.role_permissions.iter().filter(|v| v["role"]["_id"] == *id).collect();
            HttpResponse::Ok().json(found)
        }
        ("POST", ["api", "user-role", "user", user_id, "role", role_id]) => {
            let duplicate = store
                .user_roles
                .iter()
                .any(|v| v["userId"] == *user_id && v["roleId"] == *role_id);
            if duplicate {
                return message(StatusCode::CONFLICT, "User already has this role");
            }
            let id = store.new_id("ur");
            let created = json!({"_id": id, "userId": user_id, "roleId": role_id});
            store.user_roles.push(created.clone());
            HttpResponse::Created().json(created)
        }
        ("POST", ["api", "role-permission", "role", role_id, "permission", permission_id]) => {
            let (Some(role), Some(permission)) = (
                find(&store.roles, role_id).cloned(),
                find(&store.permissions, permission_id).cloned(),
            ) else {
                return message(StatusCode::NOT_FOUND, "Role or permission not found");
            };
            let id = store.new_id("rp");
            store.role_permissions.push(json!({"_id": id, "role": role, "permission": permission}));
            HttpResponse::Created().finish()
        }
        ("GET", ["api", name]) => match store.collection(name) {
            Some(items) => HttpResponse::Ok().json(&*items),
            None => HttpResponse::NotFound().finish(),
        },
        ("GET", ["api", name, id]) => match store.collection(name).and_then(|items| find(items, id).cloned()) {
            Some(item) => HttpResponse::Ok().json(item),
            None => message(StatusCode::NOT_FOUND, "Not found"),
        },
        ("POST", ["api", name]) => {
            if name == &"users"
                && store.users.iter().any(|u| u["email"] == body["email"])
            {
                return message(StatusCode::CONFLICT, "Email already registered");
            }
            let id = store.new_id(name);
            let mut created = body.clone();
            created["_id"] = json!(id);
            match store.collection(name) {
                Some(items) => {
                    items.push(created.clone());
                    HttpResponse::Created().json(created)
                }
                None => HttpResponse::NotFound().finish(),
            }
        }
        ("PUT", ["api", name, id]) => {
            let Some(item) = store
                .collection(name)
                .and_then(|items| items.iter_mut().find(|v| v["_id"] == *id))
            else {
                return message(StatusCode::NOT_FOUND, "Not found");
            };
            if let (Some(target), Some(fields)) = (item.as_object_mut(), body.as_object()) {
                for (k, v) in fields {
                    target.insert(k.clone(), v.clone());
                }
            }
            HttpResponse::Ok().json(item.clone())
        }
        ("DELETE", ["api", name, id]) => match store.collection(name) {
            Some(items) if items.iter().any(|v| v["_id"] == *id) => {
                items.retain(|v| v["_id"] != *id);
                HttpResponse::NoContent().finish()
            }
            _ => message(StatusCode::NOT_FOUND, "Not found"),
        },
        _ => HttpResponse::NotFound().finish(),
    }
}

/// The REST backend, faked in memory and served over real HTTP.
pub struct FakeBackend {
    pub store: web::Data<Mutex<Store>>,
    pub url: String,
}

impl FakeBackend {
    pub async fn start(store: Store) -> Self {
        let data = web::Data::new(Mutex::new(store));
        let shared = data.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(shared.clone())
                .default_service(web::to(handle))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind fake backend");
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        Self { store: data, url: format!("http://{addr}") }
    }

    pub async fn seeded() -> Self {
        Self::start(Store::seeded()).await
    }

    /// A client pointed at this backend, without a token.
    pub fn api(&self) -> ApiClient {
        let settings = Settings { api_url: self.url.clone(), ..Settings::default() };
        ApiClient::new(&settings).expect("Failed to create API client")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.store.lock().unwrap().requests.clone()
    }

    /// `"METHOD /path"` for every request received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::line).collect()
    }

    pub fn clear_requests(&self) {
        self.store.lock().unwrap().requests.clear();
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut self.store.lock().unwrap())
    }
}

// ============================================================================
// APP UNDER TEST
// ============================================================================

/// The admin app wired exactly as `main` does, talking through `api`.
pub fn app(
    api: ApiClient,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(session_middleware(Key::generate(), false))
        .app_data(web::Data::new(api))
        .configure(routes)
        .default_service(web::to(not_found))
}

/// A response, read to completion.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Extract the CSRF token from a rendered form.
pub fn csrf_token(html: &str) -> Option<String> {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]+)""#).unwrap();
    re.captures(html).map(|c| c[1].to_string())
}

/// Keeps the session cookie and the last seen CSRF token between requests.
///
/// `build` turns a `TestRequest` into the app's request type; pass
/// `TestRequest::to_request`.
pub struct Browser<R> {
    build: fn(TestRequest) -> R,
    cookie: Option<Cookie<'static>>,
    pub csrf: String,
}

impl<R> Browser<R> {
    pub fn new(build: fn(TestRequest) -> R) -> Self {
        Self { build, cookie: None, csrf: String::new() }
    }

    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn send<S, B>(&mut self, app: &S, req: TestRequest) -> Page
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = match &self.cookie {
            Some(c) => req.cookie(c.clone()),
            None => req,
        };
        let resp = test::call_service(app, (self.build)(req)).await;

        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        if let Some(c) = resp.response().cookies().find(|c| c.name() == "id") {
            self.cookie = if c.value().is_empty() { None } else { Some(c.into_owned()) };
        }

        let bytes = test::read_body(resp).await;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        if let Some(token) = csrf_token(&body) {
            self.csrf = token;
        }
        Page { status, location, body }
    }

    pub async fn get<S, B>(&mut self, app: &S, uri: &str) -> Page
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(app, TestRequest::get().uri(uri)).await
    }

    /// POST a form; the current CSRF token is added automatically.
    pub async fn post<S, B>(&mut self, app: &S, uri: &str, fields: &[(&str, &str)]) -> Page
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let mut form: Vec<(String, String)> =
            fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        form.push(("csrf_token".to_string(), self.csrf.clone()));
        self.send(app, TestRequest::post().uri(uri).set_form(form)).await
    }

    /// Walk the login and 2FA screens as `email`.
    pub async fn sign_in<S, B>(&mut self, app: &S, email: &str)
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.get(app, "/auth/login").await;
        let page = self
            .post(app, "/auth/login", &[("email", email), ("password", PASSWORD)])
            .await;
        assert_eq!(page.status, StatusCode::SEE_OTHER);
        assert!(page.location.unwrap_or_default().starts_with("/auth/verify-2fa"));

        let page = self
            .post(
                app,
                "/auth/verify-2fa",
                &[("email", email), ("session_id", SESSION_ID), ("code", VALID_CODE)],
            )
            .await;
        assert_eq!(page.location.as_deref(), Some("/dashboard"));
        assert!(self.has_session());
    }
}
