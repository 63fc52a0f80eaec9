use actix_session::Session;

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::SessionUser;
use crate::views::Notice;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const NOTICE_KEY: &str = "notice";

pub fn get_token(session: &Session) -> Option<String> {
    session
        .get::<String>(TOKEN_KEY)
        .unwrap_or(None)
        .filter(|t| !t.is_empty())
}

pub fn is_signed_in(session: &Session) -> bool {
    get_token(session).is_some()
}

pub fn get_user(session: &Session) -> Option<SessionUser> {
    session.get::<SessionUser>(USER_KEY).unwrap_or(None)
}

/// Store the bearer token and user. The session id is renewed to avoid fixation.
pub fn sign_in(session: &Session, token: &str, user: &SessionUser) -> Result<(), AppError> {
    session.renew();
    session
        .insert(TOKEN_KEY, token)
        .map_err(|e| AppError::Session(format!("Failed to store token: {e}")))?;
    session
        .insert(USER_KEY, user)
        .map_err(|e| AppError::Session(format!("Failed to store user: {e}")))?;
    Ok(())
}

/// Clear stored credentials and everything else kept for this browser.
pub fn sign_out(session: &Session) {
    session.purge();
}

/// An API client carrying this session's bearer token, if any.
pub fn api_for(api: &ApiClient, session: &Session) -> ApiClient {
    api.with_token(get_token(session))
}

/// Queue a one-shot notice for the next rendered page.
pub fn set_notice(session: &Session, notice: Notice) {
    if let Err(e) = session.insert(NOTICE_KEY, &notice) {
        log::warn!("Failed to store notice: {e}");
    }
}

pub fn take_notice(session: &Session) -> Option<Notice> {
    let notice = session.get::<Notice>(NOTICE_KEY).unwrap_or(None);
    if notice.is_some() {
        session.remove(NOTICE_KEY);
    }
    notice
}
