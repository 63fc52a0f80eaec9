use askama::Template;

use crate::views::Notice;

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<Notice>,
    pub email: String,
    pub csrf_token: String,
    pub providers: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "auth/verify_2fa.html")]
pub struct Verify2faTemplate {
    pub error: Option<String>,
    pub email: String,
    pub session_id: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub errors: Vec<String>,
    pub name: String,
    pub email: String,
    pub csrf_token: String,
}
