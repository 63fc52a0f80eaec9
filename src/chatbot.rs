//! TravelBot: canned keyword replies for the messages page.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Conversation history lives in the session cookie, so it is capped at this many messages.
pub const MAX_HISTORY: usize = 10;

/// Serialized size the stored history is kept under, leaving room in the cookie for the sign-in state.
pub const MAX_HISTORY_BYTES: usize = 2048;

/// Longer messages are cut to this many characters before they reach the history.
pub const MAX_MESSAGE_CHARS: usize = 500;

pub const BOT_NAME: &str = "TravelBot";

const GREETING: &str = "Hi! I'm TravelBot, your virtual assistant. How can I help you today?";

const SUGGESTIONS: [&str; 4] = [
    "Trip information",
    "My booking status",
    "Cancellation policy",
    "Talk to an agent",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub is_bot: bool,
    /// `HH:MM`, local time.
    pub timestamp: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            content: content.trim().chars().take(MAX_MESSAGE_CHARS).collect(),
            is_bot: false,
            timestamp: now(),
            suggestions: Vec::new(),
        }
    }

    pub fn bot(content: &str) -> Self {
        Self {
            content: content.to_string(),
            is_bot: true,
            timestamp: now(),
            suggestions: Vec::new(),
        }
    }
}

fn now() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Opening message with the suggestion chips.
pub fn greeting() -> ChatMessage {
    ChatMessage {
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        ..ChatMessage::bot(GREETING)
    }
}

/// Pick a canned answer by keyword, first match wins.
pub fn reply(text: &str) -> &'static str {
    let msg = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| msg.contains(w));

    if has(&["reserva", "booking"]) {
        "To check your booking status I need your confirmation number. You can also review your bookings under 'My Trips' in your account."
    } else if has(&["cancelar", "cancelación", "cancel"]) {
        "Cancellation policies depend on the service. Trips: free up to 48 hours before departure. Lodging: up to 24 hours before check-in. Is there something specific you need to cancel?"
    } else if has(&["pago", "factura", "payment", "invoice"]) {
        "We accept credit and debit cards, bank transfers and instalment plans. Invoices are emailed automatically. Do you have a problem with a payment?"
    } else if has(&["agente", "humano", "agent", "human"]) {
        "I'll connect you with one of our agents. Please wait a moment while I find someone available."
    } else {
        "I understand. To help you better, could you be more specific about what you need? I can also put you in touch with a human agent."
    }
}

/// Append the user's message and the bot's answer, dropping the oldest
/// messages beyond [`MAX_HISTORY`] or [`MAX_HISTORY_BYTES`]. Blank input is ignored.
pub fn converse(history: &mut Vec<ChatMessage>, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    history.push(ChatMessage::user(text));
    history.push(ChatMessage::bot(reply(text)));
    if history.len() > MAX_HISTORY {
        let excess = history.len() - MAX_HISTORY;
        history.drain(..excess);
    }
    // The latest exchange always stays.
    while history.len() > 2 && serialized_len(history) > MAX_HISTORY_BYTES {
        history.remove(0);
    }
    true
}

fn serialized_len(history: &[ChatMessage]) -> usize {
    serde_json::to_vec(history).map(|v| v.len()).unwrap_or(usize::MAX)
}
