use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use super::{
    api::{ApiClient, ClientError, into_data},
    store::{SessionStore, TOKEN_KEY, USER_KEY},
};
use crate::models::{
    ApiResponse, AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, UpdatePasswordRequest, UpdateUserRequest, User,
};

/// AuthState
///
/// Snapshot of the session as the UI sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// True until the first `check_auth` completes, and while a call is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    pub fn is_student(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Student)
    }
}

#[derive(Deserialize)]
struct TokenPayload {
    exp: Option<i64>,
}

/// Reads `exp` from the token's payload segment without checking the signature.
/// `None` when the token is not a decodable JWT or carries no expiry.
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<TokenPayload>(&bytes).ok()?.exp
}

/// A token is usable when it decodes and its expiry is not in the past.
pub fn token_is_live(token: &str, now: i64) -> bool {
    token_expiry(token).is_some_and(|exp| exp >= now)
}

/// AuthSession
///
/// The client-side session: who is signed in, whether a call is running, and the
/// last error. Tokens and the user record are persisted in the `SessionStore`.
pub struct AuthSession {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    state: Mutex<AuthState>,
}

impl AuthSession {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state().is_admin()
    }

    pub fn is_student(&self) -> bool {
        self.state().is_student()
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn forget(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        self.update(|s| s.user = None);
    }

    fn remember_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(e) => tracing::warn!("user not cached: {e}"),
        }
        let user = user.clone();
        self.update(|s| s.user = Some(user));
    }

    fn start_session(&self, auth: &AuthResponse) {
        self.store.set(TOKEN_KEY, &auth.token);
        self.remember_user(&auth.user);
        self.api.session_restored();
    }

    /// Runs one API call with `loading` raised, recording any failure in `error`.
    async fn track<T>(
        &self,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = call.await;
        let error = result.as_ref().err().map(|e| e.message.clone());
        self.update(|s| {
            s.loading = false;
            s.error = error;
        });
        result
    }

    /// check_auth
    ///
    /// Restores the session from the store. Without a token there is no network
    /// call. An expired or undecodable token is discarded locally. Otherwise
    /// `/auth/me` is fetched once and its user cached; if that fails the
    /// stored session is discarded.
    pub async fn check_auth(&self) -> bool {
        let restored = self.restore().await;
        self.update(|s| s.loading = false);
        restored
    }

    async fn restore(&self) -> bool {
        let Some(token) = self.store.get(TOKEN_KEY) else {
            self.update(|s| s.user = None);
            return false;
        };
        if !token_is_live(&token, Utc::now().timestamp()) {
            tracing::debug!("stored token expired or unreadable");
            self.forget();
            return false;
        }
        match self.api.get_data::<User>("/auth/me").await {
            Ok(user) => {
                self.remember_user(&user);
                true
            }
            Err(e) => {
                tracing::debug!("session check failed: {e}");
                self.forget();
                false
            }
        }
    }

    /// Signs in through `/admin/login` when `is_admin_login`, else `/auth/login`.
    pub async fn login(
        &self,
        credentials: &LoginRequest,
        is_admin_login: bool,
    ) -> Result<User, ClientError> {
        let path = if is_admin_login {
            "/admin/login"
        } else {
            "/auth/login"
        };
        let auth: AuthResponse = self.track(self.api.post(path, credentials)).await?;
        self.start_session(&auth);
        Ok(auth.user)
    }

    /// Ends the session. The server call is best-effort; local state is always cleared.
    pub async fn logout(&self) {
        if let Err(e) = self.api.get::<Value>("/auth/logout").await {
            tracing::warn!("logout request failed: {e}");
        }
        self.forget();
        self.update(|s| s.error = None);
    }

    pub async fn register(&self, details: &RegisterRequest) -> Result<User, ClientError> {
        let auth: AuthResponse = self.track(self.api.post("/auth/register", details)).await?;
        self.start_session(&auth);
        Ok(auth.user)
    }

    pub async fn update_profile(&self, changes: &UpdateUserRequest) -> Result<User, ClientError> {
        let response: ApiResponse<User> = self
            .track(self.api.put("/auth/updatedetails", changes))
            .await?;
        let user = into_data(response)?;
        self.remember_user(&user);
        Ok(user)
    }

    /// Changes the password; the server answers with a fresh token, which replaces the old one.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let body = UpdatePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let auth: AuthResponse = self
            .track(self.api.put("/auth/updatepassword", &body))
            .await?;
        self.start_session(&auth);
        Ok(())
    }

    /// Requests a reset token. Returns the server's response as-is; in local
    /// mode its `data.resetToken` carries the token.
    pub async fn forgot_password(&self, email: &str) -> Result<ApiResponse<Value>, ClientError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.track(self.api.post("/auth/forgotpassword", &body))
            .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<User, ClientError> {
        let body = ResetPasswordRequest {
            password: password.to_string(),
        };
        let path = format!("/auth/resetpassword/{token}");
        let auth: AuthResponse = self.track(self.api.put(&path, &body)).await?;
        self.start_session(&auth);
        Ok(auth.user)
    }
}
