use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Minimum length accepted for `SESSION_KEY` (actix `Key::from` needs 64 bytes).
pub const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime settings, read from the environment (and `.env` via dotenvy in `main`).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the REST backend, e.g. `http://localhost:8080`.
    pub api_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    /// No timeout unless explicitly configured.
    pub api_timeout: Option<Duration>,
    pub cookie_secure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_key: None,
            api_timeout: None,
            cookie_secure: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let bind_addr = lookup("BIND_ADDR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.bind_addr);

        let session_key = match lookup("SESSION_KEY") {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => Some(val),
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {}+), ignoring it",
                    val.len(),
                    MIN_SESSION_KEY_LEN
                );
                None
            }
            None => None,
        };

        let api_timeout = lookup("API_TIMEOUT_SECS").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                log::warn!("Invalid API_TIMEOUT_SECS '{raw}', requests will not time out");
                None
            }
        });

        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.cookie_secure);

        Self { api_url, bind_addr, session_key, api_timeout, cookie_secure }
    }
}
