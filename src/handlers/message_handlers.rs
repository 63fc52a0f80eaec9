use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::csrf;
use crate::chatbot::{self, BOT_NAME, ChatMessage};
use crate::errors::{AppError, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::templates_structs::{MessagesTemplate, PageContext};
use super::see_other;

const PAGE: &str = "/dashboard/messages";
const CHAT_KEY: &str = "chat";

#[derive(Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
    pub csrf_token: String,
}

fn history(session: &Session) -> Vec<ChatMessage> {
    session
        .get::<Vec<ChatMessage>>(CHAT_KEY)
        .unwrap_or(None)
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| vec![chatbot::greeting()])
}

pub async fn page(session: Session) -> Result<HttpResponse, AppError> {
    let messages = history(&session);
    let suggestions = messages.last().map(|m| m.suggestions.clone()).unwrap_or_default();
    let tmpl = MessagesTemplate {
        ctx: PageContext::build(&session, PAGE),
        bot_name: BOT_NAME,
        messages,
        suggestions,
    };
    render(tmpl)
}

pub async fn send(
    session: Session,
    form: web::Form<MessageForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut messages = history(&session);
    if chatbot::converse(&mut messages, &form.text) {
        session
            .insert(CHAT_KEY, &messages)
            .map_err(|e| AppError::Session(format!("Failed to store conversation: {e}")))?;
    }
    Ok(see_other(PAGE))
}

pub async fn reset(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.remove(CHAT_KEY);
    Ok(see_other(PAGE))
}
