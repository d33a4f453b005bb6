use reqwest::{Client, RequestBuilder, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;

use super::{
    navigator::{Navigator, SESSION_EXPIRED_PATH, is_login_path},
    store::{SessionStore, TOKEN_KEY, USER_KEY},
};
use crate::models::ApiResponse;

const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
const SERVER_MESSAGE: &str = "Server error. Please try again later.";

/// ErrorOrigin
///
/// What actually went wrong underneath a `ClientError`.
#[derive(Debug, Error)]
pub enum ErrorOrigin {
    /// No usable response: connection refused, reset, TLS failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// A success status with a body that did not match the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    /// The error body the server sent, parsed as JSON when possible.
    #[error("server responded with {0}")]
    Body(Value),
}

/// ClientError
///
/// The single error shape every API call returns. `message` is safe to show
/// to the user.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    pub status: Option<StatusCode>,
    #[source]
    pub original: Option<ErrorOrigin>,
}

impl ClientError {
    fn network(err: reqwest::Error) -> Self {
        tracing::warn!("request failed without a response: {err}");
        Self {
            message: NETWORK_MESSAGE.to_string(),
            status: None,
            original: Some(ErrorOrigin::Transport(err)),
        }
    }

    fn decode(status: StatusCode, err: serde_json::Error) -> Self {
        Self {
            message: "Unexpected response from server".to_string(),
            status: Some(status),
            original: Some(ErrorOrigin::Decode(err)),
        }
    }

    fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let body: Value = serde_json::from_slice(body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
        let message = if status.is_server_error() {
            tracing::error!(status = status.as_u16(), body = %body, "server error");
            SERVER_MESSAGE.to_string()
        } else {
            body.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
        };
        Self {
            message,
            status: Some(status),
            original: Some(ErrorOrigin::Body(body)),
        }
    }

    /// An envelope that decoded but lacked its `data`.
    pub(crate) fn missing_data() -> Self {
        Self {
            message: "Unexpected response from server".to_string(),
            status: None,
            original: None,
        }
    }

    /// The `message` field of the server's error body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match &self.original {
            Some(ErrorOrigin::Body(body)) => body.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// ApiClient
///
/// Thin wrapper over `reqwest` for the `/api` surface. It attaches the stored
/// bearer token, normalizes failures into `ClientError`, and on a 401 outside
/// the login pages clears the session and sends the user to the login page.
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    // Set once a 401 redirect has fired; cleared when a new session is stored.
    redirecting: AtomicBool,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            navigator,
            redirecting: AtomicBool::new(false),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.http.delete(self.url(path))).await
    }

    /// Posts a multipart form, e.g. image uploads.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ClientError> {
        self.send(self.http.post(self.url(path)).multipart(form)).await
    }

    /// GET that unwraps the `{ success, data }` envelope.
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        into_data(self.get::<ApiResponse<T>>(path).await?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match self.store.get(TOKEN_KEY) {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(ClientError::network)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::network)?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| ClientError::decode(status, e));
        }
        if status == StatusCode::UNAUTHORIZED {
            self.session_expired();
        }
        Err(ClientError::from_response(status, &body))
    }

    /// Clears the stored session and redirects to the login page, unless the
    /// user is already on a login page. Concurrent 401s redirect only once.
    fn session_expired(&self) {
        if is_login_path(&self.navigator.current_path()) {
            return;
        }
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        if !self.redirecting.swap(true, Ordering::SeqCst) {
            tracing::info!("session expired, redirecting to login");
            self.navigator.navigate(SESSION_EXPIRED_PATH);
        }
    }

    /// Re-arms the expiry redirect after a new session has been stored.
    pub fn session_restored(&self) {
        self.redirecting.store(false, Ordering::SeqCst);
    }
}

pub(crate) fn into_data<T>(response: ApiResponse<T>) -> Result<T, ClientError> {
    response.data.ok_or_else(ClientError::missing_data)
}
