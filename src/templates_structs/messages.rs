use askama::Template;

use crate::chatbot::ChatMessage;
use super::PageContext;

#[derive(Template)]
#[template(path = "messages.html")]
pub struct MessagesTemplate {
    pub ctx: PageContext,
    pub bot_name: &'static str,
    pub messages: Vec<ChatMessage>,
    pub suggestions: Vec<String>,
}
