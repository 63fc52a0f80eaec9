use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Settings;
use super::error::{ApiError, Target, backend_message};

/// How a request authenticates against the backend.
#[derive(Debug, Clone)]
pub(crate) enum Auth<'a> {
    /// Attach the session bearer token if one is present; a 401 means the session is gone.
    Session,
    /// Public endpoint (login, 2FA). A 401 is a credential failure, not a session expiry.
    Public,
    /// Public endpoint called with an explicit bearer (federated provider token).
    Bearer(&'a str),
}

/// Thin typed wrapper over the REST backend.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted, so a
/// per-request copy carrying the caller's token is built with [`ApiClient::with_token`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &Settings) -> Result<Self, String> {
        let base_url = Url::parse(&settings.api_url)
            .map_err(|e| format!("Invalid API_URL '{}': {e}", settings.api_url))?;
        if base_url.cannot_be_a_base() {
            return Err(format!("API_URL '{}' cannot be used as a base URL", settings.api_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.api_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

        Ok(Self { http, base_url, token: None })
    }

    /// Same backend, different credentials.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        target: Target,
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, segments, None, target, Auth::Session).await?;
        read_json(response, target).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        target: Target,
        auth: Auth<'_>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body, target)?;
        let response = self.execute(Method::POST, segments, Some(body), target, auth).await?;
        read_json(response, target).await
    }

    /// POST without a request body. The response payload is optional.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        target: Target,
        auth: Auth<'_>,
    ) -> Result<Option<T>, ApiError> {
        let response = self.execute(Method::POST, segments, None, target, auth).await?;
        read_optional(response, target).await
    }

    pub(crate) async fn put<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        target: Target,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body, target)?;
        let response = self.execute(Method::PUT, segments, Some(body), target, Auth::Session).await?;
        read_json(response, target).await
    }

    pub(crate) async fn delete(&self, segments: &[&str], target: Target) -> Result<(), ApiError> {
        self.execute(Method::DELETE, segments, None, target, Auth::Session).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
        target: Target,
        auth: Auth<'_>,
    ) -> Result<Response, ApiError> {
        let url = self.url(segments);
        let mut request = self.http.request(method.clone(), url.clone());
        match (&auth, &self.token) {
            (Auth::Session, Some(token)) => request = request.bearer_auth(token),
            (Auth::Bearer(token), _) => request = request.bearer_auth(token),
            _ => {}
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("{method} {} failed: {e}", url.path());
            ApiError::failed(target, None, None)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && matches!(auth, Auth::Session) {
            log::warn!("{method} {} rejected with 401, session credentials are no longer valid", url.path());
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::warn!("{method} {} returned {}", url.path(), status.as_u16());
            return Err(ApiError::failed(target, Some(status.as_u16()), backend_message(&text)));
        }

        Ok(response)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B, target: Target) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| {
        log::error!("Failed to encode {} payload: {e}", target.resource);
        ApiError::failed(target, None, None)
    })
}

async fn read_json<T: DeserializeOwned>(response: Response, target: Target) -> Result<T, ApiError> {
    match read_optional(response, target).await? {
        Some(value) => Ok(value),
        None => Err(ApiError::failed(target, None, Some("No response from server".to_string()))),
    }
}

async fn read_optional<T: DeserializeOwned>(
    response: Response,
    target: Target,
) -> Result<Option<T>, ApiError> {
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| {
        log::warn!("Failed to read {} response body: {e}", target.resource);
        ApiError::failed(target, Some(status), None)
    })?;

    if text.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&text).map(Some).map_err(|e| {
        log::warn!("Unexpected {} payload: {e}", target.resource);
        ApiError::failed(target, Some(status), None)
    })
}
